//! Conversions between Arrow arrays and [`Datum`] values.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, Decimal128Array, Float32Array, Float64Array,
    Int8Array, Int16Array, Int32Array, Int64Array, LargeBinaryArray, LargeStringArray, NullArray,
    StringArray, UInt8Array, UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use dagg_result::{Error, Result};

use crate::datum::Datum;
use crate::decimal::{DecimalValue, MAX_DECIMAL_PRECISION};

fn downcast<'a, T: 'static>(array: &'a ArrayRef, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::Internal(format!("expected {name} array")))
}

impl Datum {
    /// Read the value at `idx` from an Arrow array.
    pub fn from_array(array: &ArrayRef, idx: usize) -> Result<Datum> {
        if idx >= array.len() {
            return Err(Error::InvalidArgumentError(format!(
                "row {idx} out of bounds for array of length {}",
                array.len()
            )));
        }
        if array.is_null(idx) {
            return Ok(Datum::Null);
        }
        let datum = match array.data_type() {
            DataType::Null => Datum::Null,
            DataType::Boolean => {
                Datum::Int64(downcast::<BooleanArray>(array, "Boolean")?.value(idx) as i64)
            }
            DataType::Int8 => Datum::Int64(downcast::<Int8Array>(array, "Int8")?.value(idx).into()),
            DataType::Int16 => {
                Datum::Int64(downcast::<Int16Array>(array, "Int16")?.value(idx).into())
            }
            DataType::Int32 => {
                Datum::Int64(downcast::<Int32Array>(array, "Int32")?.value(idx).into())
            }
            DataType::Int64 => Datum::Int64(downcast::<Int64Array>(array, "Int64")?.value(idx)),
            DataType::UInt8 => {
                Datum::UInt64(downcast::<UInt8Array>(array, "UInt8")?.value(idx).into())
            }
            DataType::UInt16 => {
                Datum::UInt64(downcast::<UInt16Array>(array, "UInt16")?.value(idx).into())
            }
            DataType::UInt32 => {
                Datum::UInt64(downcast::<UInt32Array>(array, "UInt32")?.value(idx).into())
            }
            DataType::UInt64 => {
                Datum::UInt64(downcast::<UInt64Array>(array, "UInt64")?.value(idx))
            }
            DataType::Float32 => {
                Datum::Float64(downcast::<Float32Array>(array, "Float32")?.value(idx).into())
            }
            DataType::Float64 => {
                Datum::Float64(downcast::<Float64Array>(array, "Float64")?.value(idx))
            }
            DataType::Decimal128(_, scale) => {
                let raw = downcast::<Decimal128Array>(array, "Decimal128")?.value(idx);
                Datum::Decimal(DecimalValue::new(raw, *scale)?)
            }
            DataType::Utf8 => {
                Datum::String(downcast::<StringArray>(array, "String")?.value(idx).to_owned())
            }
            DataType::LargeUtf8 => Datum::String(
                downcast::<LargeStringArray>(array, "LargeString")?
                    .value(idx)
                    .to_owned(),
            ),
            DataType::Binary => {
                Datum::Bytes(downcast::<BinaryArray>(array, "Binary")?.value(idx).to_vec())
            }
            DataType::LargeBinary => Datum::Bytes(
                downcast::<LargeBinaryArray>(array, "LargeBinary")?
                    .value(idx)
                    .to_vec(),
            ),
            other => {
                return Err(Error::InvalidArgumentError(format!(
                    "unsupported array type {other:?}"
                )));
            }
        };
        Ok(datum)
    }
}

#[derive(Default)]
struct ColumnShape {
    int: bool,
    uint: bool,
    float: bool,
    decimal: bool,
    text: bool,
    bytes: bool,
    max_scale: i8,
}

impl ColumnShape {
    fn scan(values: &[Datum]) -> Self {
        let mut shape = ColumnShape::default();
        for value in values {
            match value {
                Datum::Null => {}
                Datum::Int64(_) => shape.int = true,
                Datum::UInt64(_) => shape.uint = true,
                Datum::Float64(_) => shape.float = true,
                Datum::Decimal(d) => {
                    shape.decimal = true;
                    shape.max_scale = shape.max_scale.max(d.scale());
                }
                Datum::String(_) => shape.text = true,
                Datum::Bytes(_) => shape.bytes = true,
            }
        }
        shape
    }

    fn numeric(&self) -> bool {
        self.int || self.uint || self.float || self.decimal
    }

    fn stringy(&self) -> bool {
        self.text || self.bytes
    }
}

/// Build one Arrow column from a slice of values, unifying their types.
///
/// Integers of one signedness stay native; mixed signedness or any decimal
/// widens to `Decimal128(38, max_scale)`; any float widens to `Float64`. Text
/// mixed with binary becomes `Binary`. Numerics mixed with strings are
/// rejected.
pub fn datums_to_array(values: &[Datum]) -> Result<ArrayRef> {
    let shape = ColumnShape::scan(values);
    if shape.numeric() && shape.stringy() {
        return Err(Error::InvalidArgumentError(
            "cannot build a column mixing numeric and string values".into(),
        ));
    }

    if shape.float {
        let array: Float64Array = values.iter().map(Datum::as_f64).collect();
        return Ok(Arc::new(array));
    }
    if shape.decimal || (shape.int && shape.uint) {
        let scale = shape.max_scale;
        let raw = values
            .iter()
            .map(|v| match v.as_exact_decimal() {
                Some(d) => widen_to_scale(d, scale).map(Some),
                None => Ok(None),
            })
            .collect::<Result<Vec<_>>>()?;
        let array = Decimal128Array::from(raw)
            .with_precision_and_scale(MAX_DECIMAL_PRECISION, scale)?;
        return Ok(Arc::new(array));
    }
    if shape.int {
        let array: Int64Array = values
            .iter()
            .map(|v| match v {
                Datum::Int64(i) => Some(*i),
                _ => None,
            })
            .collect();
        return Ok(Arc::new(array));
    }
    if shape.uint {
        let array: UInt64Array = values
            .iter()
            .map(|v| match v {
                Datum::UInt64(u) => Some(*u),
                _ => None,
            })
            .collect();
        return Ok(Arc::new(array));
    }
    if shape.bytes {
        let array: BinaryArray = values
            .iter()
            .map(|v| match v {
                Datum::Bytes(b) => Some(b.as_slice()),
                Datum::String(s) => Some(s.as_bytes()),
                _ => None,
            })
            .collect();
        return Ok(Arc::new(array));
    }
    if shape.text {
        let array: StringArray = values
            .iter()
            .map(|v| match v {
                Datum::String(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        return Ok(Arc::new(array));
    }
    Ok(Arc::new(NullArray::new(values.len())))
}

fn widen_to_scale(value: DecimalValue, scale: i8) -> Result<i128> {
    let diff = (scale as i32 - value.scale() as i32).max(0) as u32;
    10_i128
        .checked_pow(diff)
        .and_then(|factor| value.raw_value().checked_mul(factor))
        .ok_or_else(|| Error::overflow("DECIMAL"))
}
