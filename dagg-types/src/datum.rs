//! Scalar values flowing through aggregate arguments, contexts and partials.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use dagg_result::{Error, Result};

use crate::decimal::DecimalValue;
use crate::internal::Utf8CaseFold;
use crate::statement_context::Collation;

/// A single SQL value.
///
/// Integers keep their signedness so that `BIGINT` and `BIGINT UNSIGNED`
/// sums overflow at the right boundary. Exact numerics (`Int64`, `UInt64`,
/// `Decimal`) compare and hash by numeric value regardless of representation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Datum {
    #[default]
    Null,
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Decimal(DecimalValue),
    String(String),
    Bytes(Vec<u8>),
}

macro_rules! impl_from_for_datum {
    ($variant:ident, $($t:ty),*) => {
        $(
            impl From<$t> for Datum {
                fn from(v: $t) -> Self {
                    Datum::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_datum!(Int64, i8, i16, i32, i64);
impl_from_for_datum!(UInt64, u8, u16, u32, u64);
impl_from_for_datum!(Float64, f32, f64);
impl_from_for_datum!(Decimal, DecimalValue);
impl_from_for_datum!(String, String);
impl_from_for_datum!(Bytes, Vec<u8>);

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::String(v.to_string())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(v: Option<T>) -> Self {
        v.map_or(Datum::Null, Into::into)
    }
}

impl Datum {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Datum::Null => "NULL",
            Datum::Int64(_) => "BIGINT",
            Datum::UInt64(_) => "BIGINT UNSIGNED",
            Datum::Float64(_) => "DOUBLE",
            Datum::Decimal(_) => "DECIMAL",
            Datum::String(_) => "VARCHAR",
            Datum::Bytes(_) => "VARBINARY",
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Datum::Int64(_) | Datum::UInt64(_) | Datum::Float64(_) | Datum::Decimal(_)
        )
    }

    /// Exact numeric view of the value, if it has one.
    pub fn as_exact_decimal(&self) -> Option<DecimalValue> {
        match self {
            Datum::Int64(v) => Some(DecimalValue::from_i64(*v)),
            Datum::UInt64(v) => Some(DecimalValue::from_u64(*v)),
            Datum::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Floating-point view of a numeric value (lossy for wide integers).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Int64(v) => Some(*v as f64),
            Datum::UInt64(v) => Some(*v as f64),
            Datum::Float64(v) => Some(*v),
            Datum::Decimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    /// Coerce into a numeric value for summation.
    ///
    /// Numerics pass through unchanged; text is parsed as `DOUBLE`.
    pub fn to_numeric(&self) -> Result<Datum> {
        match self {
            Datum::Null => Ok(Datum::Null),
            Datum::Int64(_) | Datum::UInt64(_) | Datum::Float64(_) | Datum::Decimal(_) => {
                Ok(self.clone())
            }
            Datum::String(_) | Datum::Bytes(_) => {
                let text = self.as_text();
                text.trim()
                    .parse::<f64>()
                    .map(Datum::Float64)
                    .map_err(|_| Error::expr_cast(format!("cannot convert '{text}' to a number")))
            }
        }
    }

    /// Interpret the value as a signed count.
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            Datum::Int64(v) => Ok(*v),
            Datum::UInt64(v) => i64::try_from(*v).map_err(|_| Error::overflow("BIGINT")),
            Datum::Float64(v) if v.is_finite() && v.fract() == 0.0 => {
                // i64::MIN is exactly representable; i64::MAX rounds up to 2^63.
                if *v >= -9.223_372_036_854_775_808e18 && *v < 9.223_372_036_854_775_808e18 {
                    Ok(*v as i64)
                } else {
                    Err(Error::overflow("BIGINT"))
                }
            }
            Datum::Decimal(d) if d.is_integral() => {
                let v = d.round_to_i128()?;
                i64::try_from(v).map_err(|_| Error::overflow("BIGINT"))
            }
            Datum::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::expr_cast(format!("cannot convert '{s}' to BIGINT"))),
            other => Err(Error::expr_cast(format!(
                "cannot convert {} value {other} to BIGINT",
                other.type_name()
            ))),
        }
    }

    /// Convert into the 64-bit operand used by `BIT_AND`/`BIT_OR`/`BIT_XOR`.
    ///
    /// Signed values reinterpret their two's-complement bits. Floats and
    /// decimals round half away from zero; text is parsed first.
    pub fn to_bit_operand(&self) -> Result<u64> {
        match self {
            Datum::Int64(v) => Ok(*v as u64),
            Datum::UInt64(v) => Ok(*v),
            Datum::Float64(v) => {
                if !v.is_finite() {
                    return Err(Error::expr_cast(format!(
                        "cannot use {v} as a bitwise operand"
                    )));
                }
                bit_operand_from_i128(v.round() as i128)
            }
            Datum::Decimal(d) => bit_operand_from_i128(d.round_to_i128()?),
            Datum::String(_) | Datum::Bytes(_) => {
                let text = self.as_text();
                let trimmed = text.trim();
                if let Ok(v) = trimmed.parse::<i64>() {
                    return Ok(v as u64);
                }
                if let Ok(v) = trimmed.parse::<u64>() {
                    return Ok(v);
                }
                if let Ok(d) = trimmed.parse::<DecimalValue>() {
                    return bit_operand_from_i128(d.round_to_i128()?);
                }
                if let Ok(f) = trimmed.parse::<f64>() {
                    return Datum::Float64(f).to_bit_operand();
                }
                Err(Error::expr_cast(format!(
                    "cannot convert '{text}' to a bitwise operand"
                )))
            }
            Datum::Null => Err(Error::expr_cast("NULL is not a bitwise operand")),
        }
    }

    /// Textual rendering used by `GROUP_CONCAT`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Datum::String(s) => Cow::Borrowed(s.as_str()),
            Datum::Bytes(b) => String::from_utf8_lossy(b),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Total order used by `MIN`/`MAX`.
    ///
    /// `NULL` sorts first, then numerics, then text and binary strings.
    /// Exact numerics compare exactly; comparisons involving a float use
    /// IEEE-754 semantics with `total_cmp` breaking NaN ties.
    pub fn compare(&self, other: &Datum, collation: Collation) -> Ordering {
        match (self, other) {
            (Datum::Null, Datum::Null) => Ordering::Equal,
            (Datum::String(a), Datum::String(b)) => match collation {
                Collation::Binary => a.as_bytes().cmp(b.as_bytes()),
                Collation::Utf8CaseInsensitive => {
                    Utf8CaseFold::fold(a).cmp(&Utf8CaseFold::fold(b))
                }
            },
            (Datum::String(a), Datum::Bytes(b)) => a.as_bytes().cmp(b.as_slice()),
            (Datum::Bytes(a), Datum::String(b)) => a.as_slice().cmp(b.as_bytes()),
            (Datum::Bytes(a), Datum::Bytes(b)) => a.cmp(b),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                if let (Some(l), Some(r)) = (a.as_exact_decimal(), b.as_exact_decimal()) {
                    return l.cmp(&r);
                }
                let l = a.as_f64().unwrap_or(f64::NAN);
                let r = b.as_f64().unwrap_or(f64::NAN);
                l.partial_cmp(&r).unwrap_or_else(|| l.total_cmp(&r))
            }
            (a, b) => a.family_rank().cmp(&b.family_rank()),
        }
    }

    fn family_rank(&self) -> u8 {
        match self {
            Datum::Null => 0,
            Datum::Int64(_) | Datum::UInt64(_) | Datum::Float64(_) | Datum::Decimal(_) => 1,
            Datum::String(_) | Datum::Bytes(_) => 2,
        }
    }
}

fn bit_operand_from_i128(v: i128) -> Result<u64> {
    if v < 0 {
        i64::try_from(v)
            .map(|s| s as u64)
            .map_err(|_| Error::overflow("BIGINT"))
    } else {
        u64::try_from(v).map_err(|_| Error::overflow("BIGINT UNSIGNED"))
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => f.write_str("NULL"),
            Datum::Int64(v) => write!(f, "{v}"),
            Datum::UInt64(v) => write!(f, "{v}"),
            Datum::Float64(v) => write!(f, "{v}"),
            Datum::Decimal(d) => write!(f, "{d}"),
            Datum::String(s) => f.write_str(s),
            Datum::Bytes(b) => f.write_str(&String::from_utf8_lossy(b)),
        }
    }
}
