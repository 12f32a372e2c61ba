use std::fmt;

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// A variable-width payload is too long for its `be32` length prefix.
    LengthOverflow { len: usize },
}

/// Error type for decoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input slice does not contain enough bytes to decode a value.
    NotEnoughData,
    /// The byte format is invalid for the target type (e.g., invalid UTF-8).
    InvalidFormat,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::LengthOverflow { len } => {
                write!(f, "payload of {len} bytes exceeds the 32-bit length prefix")
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotEnoughData => write!(f, "not enough data to decode value"),
            DecodeError::InvalidFormat => write!(f, "invalid encoded format"),
        }
    }
}

impl std::error::Error for EncodeError {}
impl std::error::Error for DecodeError {}

impl From<EncodeError> for dagg_result::Error {
    fn from(err: EncodeError) -> Self {
        dagg_result::Error::encoding(err)
    }
}

impl From<DecodeError> for dagg_result::Error {
    fn from(err: DecodeError) -> Self {
        dagg_result::Error::argument_resolution(err)
    }
}
