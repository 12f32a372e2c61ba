use arrow::datatypes::DataType;
use dagg_result::{Error, Result};

use crate::decimal::MAX_DECIMAL_PRECISION;

/// Declared type of an input column, as listed alongside a serialized
/// aggregate descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Int64,
    UInt64,
    Float64,
    Decimal { precision: u8, scale: i8 },
    Utf8,
    Binary,
}

impl FieldType {
    /// Map an Arrow column type onto the narrower set of aggregate input types.
    pub fn from_arrow(data_type: &DataType) -> Result<Self> {
        match data_type {
            DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64 => Ok(FieldType::Int64),
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                Ok(FieldType::UInt64)
            }
            DataType::Float32 | DataType::Float64 => Ok(FieldType::Float64),
            DataType::Decimal128(precision, scale) => Ok(FieldType::Decimal {
                precision: *precision,
                scale: *scale,
            }),
            DataType::Utf8 | DataType::LargeUtf8 => Ok(FieldType::Utf8),
            DataType::Binary | DataType::LargeBinary => Ok(FieldType::Binary),
            other => Err(Error::InvalidArgumentError(format!(
                "unsupported aggregate input type {other:?}"
            ))),
        }
    }

    pub fn to_arrow(self) -> DataType {
        match self {
            FieldType::Int64 => DataType::Int64,
            FieldType::UInt64 => DataType::UInt64,
            FieldType::Float64 => DataType::Float64,
            FieldType::Decimal { precision, scale } => {
                DataType::Decimal128(precision.min(MAX_DECIMAL_PRECISION), scale)
            }
            FieldType::Utf8 => DataType::Utf8,
            FieldType::Binary => DataType::Binary,
        }
    }
}
