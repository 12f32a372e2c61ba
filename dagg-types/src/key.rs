//! Canonical byte keys for distinct-set membership.
//!
//! Each datum becomes a one-byte family flag followed by a self-delimiting
//! payload, and the components of a tuple are concatenated. Two tuples map to
//! the same key exactly when every pair of components is equal under the
//! DISTINCT rules:
//!
//! - exact numerics (`BIGINT`, `BIGINT UNSIGNED`, `DECIMAL`) collapse by value,
//!   so `1`, `1.00` and unsigned `1` share a key;
//! - floats use canonical bits (`-0.0` equals `0.0`, all NaNs are one value);
//! - text is case-folded under [`Collation::Utf8CaseInsensitive`];
//! - binary strings never equal text.

use crate::datum::Datum;
use crate::decimal::DecimalValue;
use crate::errors::EncodeError;
use crate::internal::{BeF64, BeI128, Codec, EncodeInto, LenBytes, Utf8CaseFold};
use crate::statement_context::Collation;

const FLAG_NULL: u8 = 0;
const FLAG_EXACT: u8 = 1;
const FLAG_FLOAT: u8 = 2;
const FLAG_TEXT: u8 = 3;
const FLAG_BYTES: u8 = 4;

/// Append the canonical key for `values` to `out`.
pub fn encode_key(
    values: &[Datum],
    collation: Collation,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    for value in values {
        encode_datum(value, collation, out)?;
    }
    Ok(())
}

/// Canonical key for `values` as a fresh buffer.
pub fn encode_key_to_vec(values: &[Datum], collation: Collation) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(values.len() * 18);
    encode_key(values, collation, &mut out)?;
    Ok(out)
}

fn encode_datum(value: &Datum, collation: Collation, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Datum::Null => out.push(FLAG_NULL),
        Datum::Int64(v) => encode_exact(DecimalValue::from_i64(*v), out),
        Datum::UInt64(v) => encode_exact(DecimalValue::from_u64(*v), out),
        Datum::Decimal(d) => encode_exact(*d, out),
        Datum::Float64(v) => {
            out.push(FLAG_FLOAT);
            let canonical = if v.is_nan() {
                f64::NAN
            } else if *v == 0.0 {
                0.0
            } else {
                *v
            };
            BeF64::encode_into(out, &canonical)?;
        }
        Datum::String(s) => {
            out.push(FLAG_TEXT);
            match collation {
                Collation::Binary => LenBytes::encode_into(out, s.as_bytes())?,
                Collation::Utf8CaseInsensitive => Utf8CaseFold::encode_into(out, s)?,
            }
        }
        Datum::Bytes(b) => {
            out.push(FLAG_BYTES);
            LenBytes::encode_into(out, b)?;
        }
    }
    Ok(())
}

fn encode_exact(value: DecimalValue, out: &mut Vec<u8>) {
    let canonical = value.normalized();
    out.push(FLAG_EXACT);
    canonical.raw_value().encode_into(out);
    out.push((canonical.scale() as u8) ^ 0x80);
}

/// Width of an exact numeric component: flag, mantissa, scale.
pub const EXACT_KEY_WIDTH: usize = 1 + <BeI128 as Codec>::WIDTH + 1;
