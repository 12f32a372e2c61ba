//! Coercion of raw column values into their declared [`FieldType`].

use dagg_compute::scalar::decimal::rescale_with_rounding;
use dagg_result::{Error, Result};
use dagg_types::{Datum, DecimalValue, FieldType};

fn cast_error(value: &Datum, target: &str) -> Error {
    Error::expr_cast(format!(
        "cannot convert {} value '{}' to {}",
        value.type_name(),
        value,
        target
    ))
}

/// Convert `value` into the representation of `field_type`.
///
/// `NULL` passes through. Narrowing that would lose the integral part fails
/// with [`Error::Overflow`]; unparsable text fails with [`Error::ExprCast`].
pub fn coerce_datum(field_type: FieldType, value: Datum) -> Result<Datum> {
    if value.is_null() {
        return Ok(Datum::Null);
    }
    match field_type {
        FieldType::Int64 => to_int64(value).map(Datum::Int64),
        FieldType::UInt64 => to_uint64(value).map(Datum::UInt64),
        FieldType::Float64 => to_float64(value).map(Datum::Float64),
        FieldType::Decimal { precision, scale } => {
            let exact = to_decimal(&value)?;
            let aligned = rescale_with_rounding(exact, scale)?;
            if aligned.precision() > precision {
                return Err(Error::overflow("DECIMAL"));
            }
            Ok(Datum::Decimal(aligned))
        }
        FieldType::Utf8 => match value {
            Datum::String(s) => Ok(Datum::String(s)),
            Datum::Bytes(b) => String::from_utf8(b)
                .map(Datum::String)
                .map_err(Error::expr_cast),
            other => Ok(Datum::String(other.to_string())),
        },
        FieldType::Binary => match value {
            Datum::Bytes(b) => Ok(Datum::Bytes(b)),
            Datum::String(s) => Ok(Datum::Bytes(s.into_bytes())),
            other => Ok(Datum::Bytes(other.to_string().into_bytes())),
        },
    }
}

fn integral(value: &Datum) -> Result<i128> {
    match value {
        Datum::Int64(v) => Ok(*v as i128),
        Datum::UInt64(v) => Ok(*v as i128),
        Datum::Float64(v) if v.is_finite() => Ok(v.round() as i128),
        Datum::Decimal(d) => Ok(d.round_to_i128()?),
        Datum::String(_) | Datum::Bytes(_) => {
            let text = value.as_text();
            let trimmed = text.trim();
            if let Ok(v) = trimmed.parse::<i128>() {
                return Ok(v);
            }
            trimmed
                .parse::<DecimalValue>()
                .map_err(|_| cast_error(value, "an integer"))
                .and_then(|d| Ok(d.round_to_i128()?))
        }
        _ => Err(cast_error(value, "an integer")),
    }
}

fn to_int64(value: Datum) -> Result<i64> {
    if let Datum::Int64(v) = value {
        return Ok(v);
    }
    i64::try_from(integral(&value)?).map_err(|_| Error::overflow("BIGINT"))
}

fn to_uint64(value: Datum) -> Result<u64> {
    if let Datum::UInt64(v) = value {
        return Ok(v);
    }
    u64::try_from(integral(&value)?).map_err(|_| Error::overflow("BIGINT UNSIGNED"))
}

fn to_float64(value: Datum) -> Result<f64> {
    match value.as_f64() {
        Some(v) => Ok(v),
        None => value
            .as_text()
            .trim()
            .parse::<f64>()
            .map_err(|_| cast_error(&value, "DOUBLE")),
    }
}

fn to_decimal(value: &Datum) -> Result<DecimalValue> {
    if let Some(exact) = value.as_exact_decimal() {
        return Ok(exact);
    }
    let text = match value {
        Datum::Float64(v) if v.is_finite() => v.to_string(),
        Datum::String(_) | Datum::Bytes(_) => value.as_text().trim().to_owned(),
        _ => return Err(cast_error(value, "DECIMAL")),
    };
    text.parse::<DecimalValue>()
        .map_err(|_| cast_error(value, "DECIMAL"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_targets() {
        assert_eq!(coerce_datum(FieldType::Int64, Datum::from(" -3 ")).unwrap(), Datum::Int64(-3));
        assert_eq!(coerce_datum(FieldType::Int64, Datum::Float64(2.5)).unwrap(), Datum::Int64(3));
        assert!(coerce_datum(FieldType::Int64, Datum::UInt64(u64::MAX))
            .unwrap_err()
            .is_overflow());
        assert!(coerce_datum(FieldType::UInt64, Datum::Int64(-1))
            .unwrap_err()
            .is_overflow());
        assert!(matches!(
            coerce_datum(FieldType::Int64, Datum::from("nope")),
            Err(Error::ExprCast(_))
        ));
    }

    #[test]
    fn decimal_targets_align_scale() {
        let ft = FieldType::Decimal {
            precision: 6,
            scale: 2,
        };
        assert_eq!(coerce_datum(ft, Datum::Int64(5)).unwrap().to_string(), "5.00");
        assert_eq!(coerce_datum(ft, Datum::from("1.005")).unwrap().to_string(), "1.01");
        assert_eq!(coerce_datum(ft, Datum::Float64(0.5)).unwrap().to_string(), "0.50");
        assert!(coerce_datum(ft, Datum::Int64(100_000)).unwrap_err().is_overflow());
    }

    #[test]
    fn string_targets() {
        assert_eq!(coerce_datum(FieldType::Utf8, Datum::Int64(12)).unwrap(), Datum::from("12"));
        assert_eq!(
            coerce_datum(FieldType::Binary, Datum::from("ab")).unwrap(),
            Datum::Bytes(b"ab".to_vec())
        );
        assert!(coerce_datum(FieldType::Utf8, Datum::Bytes(vec![0xff])).is_err());
        assert_eq!(coerce_datum(FieldType::Float64, Datum::Null).unwrap(), Datum::Null);
    }
}
