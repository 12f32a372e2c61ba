pub use crate::{DecodeError, EncodeError};

/// A zero-overhead codec API for a single logical type.
pub trait Codec {
    /// Fixed encoded width in bytes. Use `0` for variable-width codecs.
    const WIDTH: usize;

    type Borrowed<'a>
    where
        Self: 'a;
    type Owned;

    fn encode_into(dst: &mut Vec<u8>, v: Self::Borrowed<'_>) -> Result<(), EncodeError>;

    fn decode(src: &[u8]) -> Result<Self::Owned, DecodeError>;
}

/// Copy the first `N` bytes of `src` into an array.
#[inline]
pub(crate) fn take_fixed<const N: usize>(src: &[u8]) -> Result<[u8; N], DecodeError> {
    src.get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or(DecodeError::NotEnoughData)
}
