//! Decimal value type used for exact numeric accumulation.
//!
//! Values follow Arrow's `Decimal128` semantics: an `i128` mantissa scaled by
//! `10^-scale`. Arithmetic kernels live in `dagg-compute`; this module only
//! owns the representation, parsing, rendering and ordering.

use std::fmt;
use std::str::FromStr;

use arrow::datatypes::DECIMAL128_MAX_PRECISION;
use arrow_buffer::i256;

/// Maximum precision supported by `DecimalValue` (aligns with Arrow's Decimal128).
pub const MAX_DECIMAL_PRECISION: u8 = DECIMAL128_MAX_PRECISION;
const POW10_BASE: i256 = i256::from_i128(10);

/// Errors that can occur while manipulating decimal values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecimalError {
    /// Requested scale falls outside the supported range.
    ScaleOutOfRange { scale: i8 },
    /// Result exceeded the maximum representable precision.
    PrecisionOverflow { value: i128, scale: i8 },
    /// Arithmetic operation overflowed the Decimal128 range.
    Overflow,
    /// Attempted to divide by zero.
    DivisionByZero,
    /// Rescale operation attempted to lower scale without exact divisibility.
    InexactRescale { from: i8, to: i8 },
    /// Text did not parse as a decimal literal.
    Parse(String),
}

impl fmt::Display for DecimalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecimalError::ScaleOutOfRange { scale } => {
                write!(f, "decimal scale {scale} outside supported range")
            }
            DecimalError::PrecisionOverflow { value, scale } => {
                write!(
                    f,
                    "decimal value {value} with scale {scale} exceeds maximum precision"
                )
            }
            DecimalError::Overflow => write!(f, "decimal arithmetic overflow"),
            DecimalError::DivisionByZero => write!(f, "decimal division by zero"),
            DecimalError::InexactRescale { from, to } => {
                write!(
                    f,
                    "cannot rescale decimal from scale {from} to {to} without losing precision"
                )
            }
            DecimalError::Parse(input) => write!(f, "invalid decimal literal '{input}'"),
        }
    }
}

impl std::error::Error for DecimalError {}

impl From<DecimalError> for dagg_result::Error {
    fn from(err: DecimalError) -> Self {
        match err {
            DecimalError::Overflow | DecimalError::PrecisionOverflow { .. } => {
                dagg_result::Error::overflow("DECIMAL")
            }
            other => dagg_result::Error::expr_cast(other),
        }
    }
}

/// Runtime representation of a Decimal128 value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecimalValue {
    value: i128,
    scale: i8,
}

impl DecimalValue {
    /// Create a decimal from its raw parts, validating precision bounds.
    pub fn new(value: i128, scale: i8) -> Result<Self, DecimalError> {
        if !scale_within_bounds(scale as i16) {
            return Err(DecimalError::ScaleOutOfRange { scale });
        }
        let precision = digit_count_i256(i256::from_i128(value));
        if precision > MAX_DECIMAL_PRECISION {
            return Err(DecimalError::PrecisionOverflow { value, scale });
        }
        Ok(Self { value, scale })
    }

    /// Construct a decimal from an integer value with zero scale.
    ///
    /// Every `i64` has at most 19 digits, well inside the precision limit.
    pub fn from_i64(value: i64) -> Self {
        Self {
            value: value as i128,
            scale: 0,
        }
    }

    /// Construct a decimal from an unsigned integer value with zero scale.
    pub fn from_u64(value: u64) -> Self {
        Self {
            value: value as i128,
            scale: 0,
        }
    }

    /// Construct a decimal from an `i128` with zero scale, checking precision.
    pub fn from_i128(value: i128) -> Result<Self, DecimalError> {
        Self::new(value, 0)
    }

    /// Return the scaled integer backing this decimal.
    #[inline]
    pub fn raw_value(self) -> i128 {
        self.value
    }

    /// Return the scale (number of fractional digits).
    #[inline]
    pub fn scale(self) -> i8 {
        self.scale
    }

    /// Return the decimal precision (total digit count).
    #[inline]
    pub fn precision(self) -> u8 {
        digit_count_i256(i256::from_i128(self.value))
    }

    /// Convert the decimal into an `f64` (lossy for high precision inputs).
    pub fn to_f64(self) -> f64 {
        if self.value == 0 {
            return 0.0;
        }
        let denominator = 10_f64.powi(self.scale as i32);
        (self.value as f64) / denominator
    }

    /// Strip trailing fractional zeros and fold negative scales into the mantissa.
    ///
    /// Two decimals compare equal exactly when their normalized forms have
    /// identical parts, which makes this the canonical form for hashing.
    pub fn normalized(self) -> Self {
        let mut value = self.value;
        let mut scale = self.scale;
        if value == 0 {
            return Self { value: 0, scale: 0 };
        }
        while scale < 0 {
            match value.checked_mul(10) {
                Some(v) if digit_count_i256(i256::from_i128(v)) <= MAX_DECIMAL_PRECISION => {
                    value = v;
                    scale += 1;
                }
                _ => break,
            }
        }
        while scale > 0 && value % 10 == 0 {
            value /= 10;
            scale -= 1;
        }
        Self { value, scale }
    }

    /// Round to the nearest integer, halves away from zero.
    pub fn round_to_i128(self) -> Result<i128, DecimalError> {
        if self.scale <= 0 {
            let factor = 10_i128
                .checked_pow((-(self.scale as i32)) as u32)
                .ok_or(DecimalError::Overflow)?;
            return self.value.checked_mul(factor).ok_or(DecimalError::Overflow);
        }
        let factor = 10_i128.pow(self.scale as u32);
        let quotient = self.value / factor;
        let remainder = self.value % factor;
        if remainder.unsigned_abs() * 2 >= factor.unsigned_abs() {
            Ok(quotient + self.value.signum())
        } else {
            Ok(quotient)
        }
    }

    /// True when the value carries no fractional part.
    pub fn is_integral(self) -> bool {
        self.normalized().scale <= 0
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale <= 0 {
            let digits = digit_buffer(i256::from_i128(self.value));
            if self.value < 0 {
                f.write_str("-")?;
            }
            f.write_str(&digits)?;
            if self.value != 0 {
                for _ in 0..(-(self.scale as i32)) {
                    f.write_str("0")?;
                }
            }
            return Ok(());
        }
        let negative = self.value < 0;
        let digits = digit_buffer(i256::from_i128(self.value));
        if digits.len() <= self.scale as usize {
            let mut result = String::with_capacity(self.scale as usize + 3);
            if negative {
                result.push('-');
            }
            result.push('0');
            result.push('.');
            for _ in digits.len()..self.scale as usize {
                result.push('0');
            }
            result.push_str(&digits);
            return f.write_str(&result);
        }
        let split = digits.len() - self.scale as usize;
        if negative {
            f.write_str("-")?;
        }
        f.write_str(&digits[..split])?;
        f.write_str(".")?;
        f.write_str(&digits[split..])
    }
}

impl FromStr for DecimalValue {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let unsigned_int = int_part.trim_start_matches(['+', '-']);
        let well_formed = !(unsigned_int.is_empty() && frac_part.is_empty())
            && int_part.len() - unsigned_int.len() <= 1
            && unsigned_int.bytes().all(|b| b.is_ascii_digit())
            && frac_part.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(DecimalError::Parse(s.to_owned()));
        }

        let scale = frac_part.len();
        if scale > MAX_DECIMAL_PRECISION as usize {
            return Err(DecimalError::ScaleOutOfRange {
                scale: i8::try_from(scale).unwrap_or(i8::MAX),
            });
        }

        let combined = format!("{}{}", int_part, frac_part);
        let value = combined
            .parse::<i128>()
            .map_err(|_| DecimalError::Overflow)?;

        Self::new(value, scale as i8)
    }
}

impl PartialOrd for DecimalValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.scale == other.scale {
            return self.value.cmp(&other.value);
        }

        let max_scale = std::cmp::max(self.scale, other.scale);
        let scale_diff_self = (max_scale as i16 - self.scale as i16) as u32;
        let scale_diff_other = (max_scale as i16 - other.scale as i16) as u32;

        // Use wrapping_pow/mul because i256 handles the overflow of i128 range
        // and we are just comparing.
        let l_scaled =
            i256::from_i128(self.value).wrapping_mul(POW10_BASE.wrapping_pow(scale_diff_self));
        let r_scaled =
            i256::from_i128(other.value).wrapping_mul(POW10_BASE.wrapping_pow(scale_diff_other));

        l_scaled.cmp(&r_scaled)
    }
}

fn digit_count_i256(mut value: i256) -> u8 {
    if value == i256::ZERO {
        return 1;
    }
    if value < i256::ZERO {
        value = value.wrapping_neg();
    }
    let mut count: u8 = 0;
    while value != i256::ZERO {
        value = value.wrapping_div(POW10_BASE);
        count += 1;
    }
    count
}

fn digit_buffer(mut value: i256) -> String {
    if value == i256::ZERO {
        return "0".to_owned();
    }
    if value < i256::ZERO {
        value = value.wrapping_neg();
    }
    let mut buf = Vec::new();
    let mut current = value;
    while current != i256::ZERO {
        let rem = current.wrapping_rem(POW10_BASE);
        let digit = rem.as_i128() as u8;
        buf.push((b'0' + digit) as char);
        current = current.wrapping_div(POW10_BASE);
    }
    buf.iter().rev().collect()
}

fn scale_within_bounds(scale: i16) -> bool {
    let max = MAX_DECIMAL_PRECISION as i16;
    (-max..=max).contains(&scale)
}
