use super::*;

/// Big-endian u64 codec. Lexicographic order == numeric order.
pub struct BeU64;

impl BeU64 {
    #[inline]
    pub fn put(dst: &mut Vec<u8>, v: u64) {
        dst.extend_from_slice(&v.to_be_bytes());
    }
}

impl Codec for BeU64 {
    const WIDTH: usize = 8;
    type Borrowed<'a> = &'a u64;
    type Owned = u64;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: &u64) -> Result<(), EncodeError> {
        Self::put(dst, *v);
        Ok(())
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<u64, DecodeError> {
        Ok(u64::from_be_bytes(take_fixed::<8>(src)?))
    }
}
