//! Type-aware numeric combination for `SUM` and `AVG`.
//!
//! Promotion follows the usual SQL ladder: integers stay integers until the
//! fixed width overflows, exact values meet in `DECIMAL`, and anything that
//! touches a float becomes `DOUBLE`. Integer overflow never wraps; it either
//! widens to `DECIMAL` or fails, depending on the statement context.

use dagg_result::{Error, Result};
use dagg_types::{Datum, DecimalValue, StatementContext, statement_context::MAX_DIV_RESULT_SCALE};

use crate::scalar::decimal;

/// Add `value` into the running sum `acc`.
///
/// A `NULL` accumulator adopts `value` (after numeric coercion); a `NULL`
/// value leaves the accumulator unchanged. Text operands are parsed as
/// `DOUBLE`.
pub fn calculate_sum(sc: &StatementContext, acc: &Datum, value: &Datum) -> Result<Datum> {
    let value = value.to_numeric()?;
    if value.is_null() {
        return acc.to_numeric();
    }
    let acc = acc.to_numeric()?;
    if acc.is_null() {
        return Ok(value);
    }

    match (&acc, &value) {
        (Datum::Int64(a), Datum::Int64(b)) => match a.checked_add(*b) {
            Some(sum) => Ok(Datum::Int64(sum)),
            None => integer_overflow(sc, "BIGINT", *a as i128 + *b as i128),
        },
        (Datum::UInt64(a), Datum::UInt64(b)) => match a.checked_add(*b) {
            Some(sum) => Ok(Datum::UInt64(sum)),
            None => integer_overflow(sc, "BIGINT UNSIGNED", *a as i128 + *b as i128),
        },
        (Datum::Int64(s), Datum::UInt64(u)) | (Datum::UInt64(u), Datum::Int64(s)) => {
            let sum = *s as i128 + *u as i128;
            if sum >= 0 {
                match u64::try_from(sum) {
                    Ok(v) => Ok(Datum::UInt64(v)),
                    Err(_) => integer_overflow(sc, "BIGINT UNSIGNED", sum),
                }
            } else {
                match i64::try_from(sum) {
                    Ok(v) => Ok(Datum::Int64(v)),
                    Err(_) => integer_overflow(sc, "BIGINT", sum),
                }
            }
        }
        (a, b) => match (a.as_exact_decimal(), b.as_exact_decimal()) {
            (Some(l), Some(r)) => Ok(Datum::Decimal(decimal::add(l, r)?)),
            _ => {
                let l = a.as_f64().unwrap_or(f64::NAN);
                let r = b.as_f64().unwrap_or(f64::NAN);
                Ok(Datum::Float64(l + r))
            }
        },
    }
}

fn integer_overflow(sc: &StatementContext, domain: &str, exact: i128) -> Result<Datum> {
    if sc.overflow_as_error() {
        return Err(Error::overflow(domain));
    }
    tracing::debug!(
        "[NUMERIC] {} sum overflowed, promoting to DECIMAL: value={}",
        domain,
        exact
    );
    Ok(Datum::Decimal(DecimalValue::from_i128(exact)?))
}

/// Divide an accumulated sum by a row count.
///
/// Exact sums produce a `DECIMAL` whose scale grows by
/// `div_precision_increment` (capped at 30 fractional digits); float sums
/// produce `DOUBLE`. A zero count
/// or `NULL` sum yields `NULL`.
pub fn average(sum: &Datum, count: i64, div_precision_increment: u8) -> Datum {
    if count == 0 || sum.is_null() {
        return Datum::Null;
    }
    if let Some(exact) = sum.as_exact_decimal() {
        let target_scale = (exact.scale().max(0) as u16 + div_precision_increment as u16)
            .min(MAX_DIV_RESULT_SCALE as u16) as i8;
        match decimal::div(exact, DecimalValue::from_i64(count), target_scale) {
            Ok(avg) => return Datum::Decimal(avg),
            Err(err) => {
                tracing::warn!(
                    "[NUMERIC] decimal AVG fell back to DOUBLE: sum={}, count={}, error={}",
                    exact,
                    count,
                    err
                );
                return Datum::Float64(exact.to_f64() / count as f64);
            }
        }
    }
    match sum.as_f64() {
        Some(total) => Datum::Float64(total / count as f64),
        None => Datum::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagg_test_utils::init_tracing_for_tests;

    fn sum_all(sc: &StatementContext, values: &[Datum]) -> Result<Datum> {
        values
            .iter()
            .try_fold(Datum::Null, |acc, v| calculate_sum(sc, &acc, v))
    }

    #[test]
    fn integers_stay_integers() {
        let sc = StatementContext::default();
        let got = sum_all(&sc, &[Datum::Int64(1), Datum::Int64(2), Datum::Int64(3)]).unwrap();
        assert_eq!(got, Datum::Int64(6));
        let unsigned = sum_all(&sc, &[Datum::UInt64(1), Datum::UInt64(2)]).unwrap();
        assert_eq!(unsigned, Datum::UInt64(3));
    }

    #[test]
    fn signed_overflow_promotes_by_default() {
        init_tracing_for_tests();
        let sc = StatementContext::default();
        let got = calculate_sum(&sc, &Datum::Int64(i64::MAX), &Datum::Int64(1)).unwrap();
        assert_eq!(got.to_string(), "9223372036854775808");
        assert!(matches!(got, Datum::Decimal(_)));
    }

    #[test]
    fn overflow_rejected_when_configured() {
        let sc = StatementContext::default().with_overflow_as_error(true);
        let err = calculate_sum(&sc, &Datum::Int64(i64::MIN), &Datum::Int64(-1)).unwrap_err();
        assert!(matches!(err, Error::Overflow(ref d) if d == "BIGINT"));
        let err = calculate_sum(&sc, &Datum::UInt64(u64::MAX), &Datum::UInt64(1)).unwrap_err();
        assert!(matches!(err, Error::Overflow(ref d) if d == "BIGINT UNSIGNED"));
    }

    #[test]
    fn mixed_signedness_and_decimal() {
        let sc = StatementContext::default();
        assert_eq!(
            calculate_sum(&sc, &Datum::UInt64(5), &Datum::Int64(-7)).unwrap(),
            Datum::Int64(-2)
        );
        let dec = Datum::Decimal("0.25".parse().unwrap());
        assert_eq!(
            calculate_sum(&sc, &Datum::Int64(2), &dec).unwrap().to_string(),
            "2.25"
        );
    }

    #[test]
    fn decimal_overflow_is_always_an_error() {
        let sc = StatementContext::default();
        let max = Datum::Decimal(DecimalValue::new(10_i128.pow(38) - 1, 0).unwrap());
        let err = calculate_sum(&sc, &max, &Datum::Int64(1)).unwrap_err();
        assert!(err.is_overflow());
    }

    #[test]
    fn floats_and_text() {
        let sc = StatementContext::default();
        let got = sum_all(&sc, &[Datum::Int64(1), Datum::Float64(0.5), Datum::from("2")]).unwrap();
        assert_eq!(got, Datum::Float64(3.5));
        let nan = calculate_sum(&sc, &Datum::Float64(f64::NAN), &Datum::Float64(1.0)).unwrap();
        assert!(matches!(nan, Datum::Float64(v) if v.is_nan()));
        assert!(matches!(
            calculate_sum(&sc, &Datum::Int64(1), &Datum::from("abc")),
            Err(Error::ExprCast(_))
        ));
    }

    #[test]
    fn null_operands() {
        let sc = StatementContext::default();
        assert_eq!(calculate_sum(&sc, &Datum::Null, &Datum::Null).unwrap(), Datum::Null);
        assert_eq!(
            calculate_sum(&sc, &Datum::Int64(4), &Datum::Null).unwrap(),
            Datum::Int64(4)
        );
    }

    #[test]
    fn average_scales_exact_results() {
        assert_eq!(average(&Datum::Int64(30), 5, 4).to_string(), "6.0000");
        let dec = Datum::Decimal("10.5".parse().unwrap());
        assert_eq!(average(&dec, 4, 4).to_string(), "2.62500");
        assert_eq!(average(&Datum::Float64(7.0), 2, 4), Datum::Float64(3.5));
        assert_eq!(average(&Datum::Int64(1), 0, 4), Datum::Null);
        assert_eq!(average(&Datum::Int64(7), 2, 0).to_string(), "4");
        assert_eq!(average(&Datum::Int64(1), 3, 90).to_string().len(), "0.".len() + 30);
    }
}
