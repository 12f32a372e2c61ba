use super::*;

/// Length-prefixed opaque bytes codec:
///   \[be32 len_bytes\]\[bytes\]
///
/// The prefix makes each payload self-delimiting when read front to back, so
/// several payloads can be concatenated into one composite key without
/// ambiguity.
pub struct LenBytes;

impl LenBytes {
    /// Split `src` into the leading payload and the remaining bytes.
    #[inline]
    pub fn decode_borrowed(src: &[u8]) -> Option<(&[u8], &[u8])> {
        let len_bytes: [u8; 4] = src.get(..4)?.try_into().ok()?;
        let n = u32::from_be_bytes(len_bytes) as usize;
        let body = src.get(4..4 + n)?;
        Some((body, &src[4 + n..]))
    }
}

impl Codec for LenBytes {
    const WIDTH: usize = 0; // variable-width
    type Borrowed<'a> = &'a [u8];
    type Owned = Vec<u8>;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, v: &[u8]) -> Result<(), EncodeError> {
        let len = u32::try_from(v.len()).map_err(|_| EncodeError::LengthOverflow { len: v.len() })?;
        dst.reserve(v.len() + 4);
        dst.extend_from_slice(&len.to_be_bytes());
        dst.extend_from_slice(v);
        Ok(())
    }

    #[inline]
    fn decode(src: &[u8]) -> Result<Vec<u8>, DecodeError> {
        Self::decode_borrowed(src)
            .map(|(body, _)| body.to_vec())
            .ok_or(DecodeError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_bytes_roundtrip_and_concatenation() {
        let mut buf = Vec::new();
        LenBytes::encode_into(&mut buf, b"ab").unwrap();
        LenBytes::encode_into(&mut buf, b"").unwrap();
        LenBytes::encode_into(&mut buf, &[0x00, 0xFF]).unwrap();

        let (first, rest) = LenBytes::decode_borrowed(&buf).unwrap();
        assert_eq!(first, b"ab");
        let (second, rest) = LenBytes::decode_borrowed(rest).unwrap();
        assert!(second.is_empty());
        let (third, rest) = LenBytes::decode_borrowed(rest).unwrap();
        assert_eq!(third, &[0x00, 0xFF]);
        assert!(rest.is_empty());
    }

    #[test]
    fn len_bytes_prefix_keeps_split_points_distinct() {
        // ("ab", "c") and ("a", "bc") must not produce the same key bytes.
        let mut left = Vec::new();
        LenBytes::encode_into(&mut left, b"ab").unwrap();
        LenBytes::encode_into(&mut left, b"c").unwrap();
        let mut right = Vec::new();
        LenBytes::encode_into(&mut right, b"a").unwrap();
        LenBytes::encode_into(&mut right, b"bc").unwrap();
        assert_ne!(left, right);
    }

    #[test]
    fn len_bytes_invalid_input_rejected() {
        assert!(LenBytes::decode_borrowed(&[]).is_none());
        let mut bad = 10u32.to_be_bytes().to_vec();
        bad.extend_from_slice(b"12345");
        assert!(LenBytes::decode(&bad).is_err());
    }
}
