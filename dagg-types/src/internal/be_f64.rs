use super::*;

/// Order-preserving f64 codec.
///
/// Positive values get the sign bit set, negative values are bit-inverted, so
/// lexicographic order of the big-endian words matches IEEE-754 total order.
pub struct BeF64;

const SIGN: u64 = 0x8000_0000_0000_0000;

impl BeF64 {
    #[inline]
    fn to_lex(v: f64) -> u64 {
        let bits = v.to_bits();
        if bits & SIGN != 0 { !bits } else { bits | SIGN }
    }
    #[inline]
    fn from_lex(u: u64) -> f64 {
        if u & SIGN != 0 {
            f64::from_bits(u & !SIGN)
        } else {
            f64::from_bits(!u)
        }
    }

    #[inline]
    pub fn put(dst: &mut Vec<u8>, v: f64) {
        dst.extend_from_slice(&Self::to_lex(v).to_be_bytes());
    }
}

impl Codec for BeF64 {
    const WIDTH: usize = 8;
    type Borrowed<'a> = &'a f64;
    type Owned = f64;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: &f64) -> Result<(), EncodeError> {
        Self::put(dst, *v);
        Ok(())
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<f64, DecodeError> {
        Ok(Self::from_lex(u64::from_be_bytes(take_fixed::<8>(src)?)))
    }
}
