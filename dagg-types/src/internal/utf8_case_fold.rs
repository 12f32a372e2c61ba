use super::*;
use icu_casemap::{CaseMapper, CaseMapperBorrowed};
use icu_normalizer::{ComposingNormalizer, ComposingNormalizerBorrowed};
use std::borrow::Cow;
use std::sync::OnceLock;

/* ----------------------- Text: case-insensitive UTF-8 ------------------- */

/// Case-insensitive UTF-8 key codec using ICU4X:
///   NFKC → default case fold (full Unicode).
///
/// Layout: `[be32 len_folded][folded_utf8]`. Only the folded form is kept, so
/// two strings that differ by case alone encode to identical bytes.
pub struct Utf8CaseFold;

impl Utf8CaseFold {
    // ICU singletons (compiled data).
    fn cm() -> &'static CaseMapperBorrowed<'static> {
        static CM: OnceLock<CaseMapperBorrowed<'static>> = OnceLock::new();
        CM.get_or_init(CaseMapper::new)
    }
    fn nfkc() -> &'static ComposingNormalizerBorrowed<'static> {
        static NFKC: OnceLock<ComposingNormalizerBorrowed<'static>> = OnceLock::new();
        NFKC.get_or_init(ComposingNormalizer::new_nfkc)
    }

    /// NFKC + default case fold, with an allocation-free path for lowercase ASCII.
    pub fn fold(s: &str) -> Cow<'_, str> {
        if s.is_ascii() {
            if !s.bytes().any(|b| b.is_ascii_uppercase()) {
                return Cow::Borrowed(s);
            }
            return Cow::Owned(s.to_ascii_lowercase());
        }
        let normalized = Self::nfkc().normalize(s);
        Cow::Owned(Self::cm().fold_string(&normalized).into_owned())
    }
}

impl Codec for Utf8CaseFold {
    const WIDTH: usize = 0;
    type Borrowed<'a> = &'a str;
    type Owned = String;

    #[inline]
    fn encode_into(dst: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
        let folded = Self::fold(s);
        LenBytes::encode_into(dst, folded.as_bytes())
    }

    /// Decode the folded form (the original spelling is not retained).
    #[inline]
    fn decode(src: &[u8]) -> Result<String, DecodeError> {
        let (body, _) = LenBytes::decode_borrowed(src).ok_or(DecodeError::InvalidFormat)?;
        std::str::from_utf8(body)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(s: &str) -> Vec<u8> {
        let mut v = Vec::new();
        Utf8CaseFold::encode_into(&mut v, s).unwrap();
        v
    }

    #[test]
    fn ascii_case_collapses() {
        assert_eq!(enc("Hello"), enc("hELLO"));
        assert_ne!(enc("Hello"), enc("Help"));
        assert_eq!(Utf8CaseFold::decode(&enc("ABC")).unwrap(), "abc");
    }

    #[test]
    fn unicode_fold_matches_case_variants() {
        // German sharp s folds to "ss".
        assert_eq!(enc("STRASSE"), enc("straße"));
        assert_eq!(enc("ÉCOLE"), enc("école"));
    }

    #[test]
    fn lowercase_ascii_is_borrowed() {
        assert!(matches!(Utf8CaseFold::fold("plain"), Cow::Borrowed(_)));
    }
}
