use super::*;

/// Big-endian i64 codec with sign-bit flip so lexicographic order == numeric order.
pub struct BeI64;

impl BeI64 {
    #[inline]
    fn to_lex(v: i64) -> u64 {
        (v as u64) ^ 0x8000_0000_0000_0000
    }
    #[inline]
    fn from_lex(u: u64) -> i64 {
        (u ^ 0x8000_0000_0000_0000) as i64
    }

    #[inline]
    pub fn put(dst: &mut Vec<u8>, v: i64) {
        dst.extend_from_slice(&Self::to_lex(v).to_be_bytes());
    }
}

impl Codec for BeI64 {
    const WIDTH: usize = 8;
    type Borrowed<'a> = &'a i64;
    type Owned = i64;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: &i64) -> Result<(), EncodeError> {
        Self::put(dst, *v);
        Ok(())
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<i64, DecodeError> {
        Ok(Self::from_lex(u64::from_be_bytes(take_fixed::<8>(src)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bei64_roundtrip_and_order() {
        let vals = [i64::MIN, -10, -1, 0, 1, 10, i64::MAX];

        let encoded: Vec<Vec<u8>> = vals
            .iter()
            .map(|v| {
                let mut b = Vec::new();
                v.encode_into(&mut b);
                b
            })
            .collect();

        // Lex sort of bytes should match numeric sort of values
        let mut bytes_sorted = encoded.clone();
        bytes_sorted.sort();
        let decoded: Vec<i64> = bytes_sorted
            .iter()
            .map(|b| BeI64::decode(b).unwrap())
            .collect();
        assert_eq!(decoded, vals.to_vec(), "lexicographic != numeric order");
    }
}
