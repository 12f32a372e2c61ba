use super::*;

/// Big-endian i128 codec with sign-bit flip. Carries decimal mantissas in keys.
pub struct BeI128;

const SIGN: u128 = 1 << 127;

impl BeI128 {
    #[inline]
    pub fn put(dst: &mut Vec<u8>, v: i128) {
        dst.extend_from_slice(&((v as u128) ^ SIGN).to_be_bytes());
    }
}

impl Codec for BeI128 {
    const WIDTH: usize = 16;
    type Borrowed<'a> = &'a i128;
    type Owned = i128;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: &i128) -> Result<(), EncodeError> {
        Self::put(dst, *v);
        Ok(())
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<i128, DecodeError> {
        Ok((u128::from_be_bytes(take_fixed::<16>(src)?) ^ SIGN) as i128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bei128_order_across_sign() {
        let mut neg = Vec::new();
        let mut zero = Vec::new();
        let mut pos = Vec::new();
        BeI128::put(&mut neg, -(10_i128.pow(30)));
        BeI128::put(&mut zero, 0);
        BeI128::put(&mut pos, 10_i128.pow(30));
        assert!(neg < zero && zero < pos);
        assert_eq!(BeI128::decode(&neg).unwrap(), -(10_i128.pow(30)));
    }
}
