//! Exact DECIMAL kernels used by SUM and AVG.
//!
//! Intermediates are widened to `i256`, so only the final narrowing back to
//! `i128` can overflow.

use arrow_buffer::i256;
use dagg_types::decimal::{DecimalError, DecimalValue, MAX_DECIMAL_PRECISION};

const TEN: i256 = i256::from_i128(10);
const TWO: i256 = i256::from_i128(2);

fn pow10(exp: u32) -> Result<i256, DecimalError> {
    if exp > u32::from(MAX_DECIMAL_PRECISION) * 2 {
        return Err(DecimalError::ScaleOutOfRange {
            scale: i8::try_from(exp).unwrap_or(i8::MAX),
        });
    }
    Ok(TEN.wrapping_pow(exp))
}

fn check_scale(scale: i8) -> Result<(), DecimalError> {
    let bound = MAX_DECIMAL_PRECISION as i16;
    if (-bound..=bound).contains(&(scale as i16)) {
        Ok(())
    } else {
        Err(DecimalError::ScaleOutOfRange { scale })
    }
}

fn narrow(wide: i256, scale: i8) -> Result<DecimalValue, DecimalError> {
    let raw = wide.to_i128().ok_or(DecimalError::Overflow)?;
    DecimalValue::new(raw, scale)
}

/// `num / den` rounded half away from zero.
fn div_round(num: i256, den: i256) -> Result<i256, DecimalError> {
    let quotient = num.checked_div(den).ok_or(DecimalError::Overflow)?;
    let remainder = num.checked_rem(den).ok_or(DecimalError::Overflow)?;
    if remainder == i256::ZERO {
        return Ok(quotient);
    }
    let twice = remainder
        .wrapping_abs()
        .checked_mul(TWO)
        .ok_or(DecimalError::Overflow)?;
    if twice < den.wrapping_abs() {
        return Ok(quotient);
    }
    let step = if (num < i256::ZERO) == (den < i256::ZERO) {
        i256::ONE
    } else {
        i256::MINUS_ONE
    };
    quotient.checked_add(step).ok_or(DecimalError::Overflow)
}

/// Move `value` to `target_scale` without changing it; fails when digits
/// would be dropped.
pub fn rescale(value: DecimalValue, target_scale: i8) -> Result<DecimalValue, DecimalError> {
    check_scale(target_scale)?;
    let from = value.scale();
    let wide = i256::from_i128(value.raw_value());
    if target_scale >= from {
        let factor = pow10((target_scale as i16 - from as i16) as u32)?;
        let scaled = wide.checked_mul(factor).ok_or(DecimalError::Overflow)?;
        return narrow(scaled, target_scale);
    }
    let factor = pow10((from as i16 - target_scale as i16) as u32)?;
    if wide.checked_rem(factor) != Some(i256::ZERO) {
        return Err(DecimalError::InexactRescale {
            from,
            to: target_scale,
        });
    }
    narrow(wide.wrapping_div(factor), target_scale)
}

/// Like [`rescale`], but drops digits by rounding half away from zero.
pub fn rescale_with_rounding(
    value: DecimalValue,
    target_scale: i8,
) -> Result<DecimalValue, DecimalError> {
    check_scale(target_scale)?;
    if target_scale >= value.scale() {
        return rescale(value, target_scale);
    }
    let factor = pow10((value.scale() as i16 - target_scale as i16) as u32)?;
    let rounded = div_round(i256::from_i128(value.raw_value()), factor)?;
    narrow(rounded, target_scale)
}

/// Exact sum at the larger of the two scales.
pub fn add(lhs: DecimalValue, rhs: DecimalValue) -> Result<DecimalValue, DecimalError> {
    let scale = lhs.scale().max(rhs.scale());
    let l = rescale(lhs, scale)?;
    let r = rescale(rhs, scale)?;
    let sum = i256::from_i128(l.raw_value())
        .checked_add(i256::from_i128(r.raw_value()))
        .ok_or(DecimalError::Overflow)?;
    narrow(sum, scale)
}

/// `lhs / rhs` at `target_scale`, rounded half away from zero.
pub fn div(
    lhs: DecimalValue,
    rhs: DecimalValue,
    target_scale: i8,
) -> Result<DecimalValue, DecimalError> {
    if rhs.raw_value() == 0 {
        return Err(DecimalError::DivisionByZero);
    }
    check_scale(target_scale)?;
    let mut num = i256::from_i128(lhs.raw_value());
    let mut den = i256::from_i128(rhs.raw_value());

    // result scale = lhs.scale - rhs.scale + shift
    let shift = target_scale as i32 + rhs.scale() as i32 - lhs.scale() as i32;
    let factor = pow10(shift.unsigned_abs())?;
    if shift >= 0 {
        num = num.checked_mul(factor).ok_or(DecimalError::Overflow)?;
    } else {
        den = den.checked_mul(factor).ok_or(DecimalError::Overflow)?;
    }
    narrow(div_round(num, den)?, target_scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> DecimalValue {
        s.parse().unwrap()
    }

    #[test]
    fn rescale_up_and_exact_down() {
        assert_eq!(rescale(dec("1.5"), 3).unwrap().to_string(), "1.500");
        assert_eq!(rescale(dec("1.500"), 1).unwrap().to_string(), "1.5");
        assert!(matches!(
            rescale(dec("1.55"), 1),
            Err(DecimalError::InexactRescale { .. })
        ));
    }

    #[test]
    fn rescale_rounding_half_away_from_zero() {
        assert_eq!(rescale_with_rounding(dec("1.25"), 1).unwrap().to_string(), "1.3");
        assert_eq!(rescale_with_rounding(dec("-1.25"), 1).unwrap().to_string(), "-1.3");
        assert_eq!(rescale_with_rounding(dec("1.24"), 1).unwrap().to_string(), "1.2");
    }

    #[test]
    fn add_aligns_scales() {
        assert_eq!(add(dec("1.5"), dec("2.25")).unwrap().to_string(), "3.75");
        let max = DecimalValue::new(10_i128.pow(38) - 1, 0).unwrap();
        assert!(add(max, dec("1")).is_err());
    }

    #[test]
    fn div_rounds_to_target_scale() {
        assert_eq!(div(dec("30"), dec("5"), 4).unwrap().to_string(), "6.0000");
        assert_eq!(div(dec("10"), dec("3"), 4).unwrap().to_string(), "3.3333");
        assert_eq!(div(dec("20"), dec("3"), 4).unwrap().to_string(), "6.6667");
        assert_eq!(div(dec("-20"), dec("3"), 2).unwrap().to_string(), "-6.67");
        assert_eq!(div(dec("1.234"), dec("1"), 1).unwrap().to_string(), "1.2");
        assert_eq!(div(dec("1"), dec("0"), 2), Err(DecimalError::DivisionByZero));
    }
}
