use dagg_result::Result;
use dagg_types::{Datum, StatementContext, encode_key};
use rustc_hash::FxHashSet;

/// Per-group set of argument tuples already seen by a DISTINCT aggregate.
///
/// Membership is decided on canonical key bytes, so values that compare equal
/// under DISTINCT rules (`1` and `1.0` as DECIMAL, case variants under a
/// case-insensitive collation) collapse, and composite tuples never collide.
#[derive(Clone, Debug, Default)]
pub struct DistinctChecker {
    seen: FxHashSet<Vec<u8>>,
    scratch: Vec<u8>,
}

impl DistinctChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `values` and report whether the tuple was new.
    pub fn check(&mut self, sc: &StatementContext, values: &[Datum]) -> Result<bool> {
        self.scratch.clear();
        encode_key(values, sc.collation(), &mut self.scratch)?;
        if self.seen.contains(self.scratch.as_slice()) {
            return Ok(false);
        }
        self.seen.insert(self.scratch.clone());
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagg_types::Collation;

    #[test]
    fn second_presentation_is_not_new() {
        let sc = StatementContext::default();
        let mut checker = DistinctChecker::new();
        assert!(checker.check(&sc, &[Datum::Int64(1)]).unwrap());
        assert!(!checker.check(&sc, &[Datum::Int64(1)]).unwrap());
        assert!(!checker
            .check(&sc, &[Datum::Decimal("1.000".parse().unwrap())])
            .unwrap());
        assert!(checker.check(&sc, &[Datum::Int64(2)]).unwrap());
        assert_eq!(checker.len(), 2);
    }

    #[test]
    fn composite_tuples() {
        let sc = StatementContext::default();
        let mut checker = DistinctChecker::new();
        assert!(checker.check(&sc, &[Datum::from("a"), Datum::from("bc")]).unwrap());
        assert!(checker.check(&sc, &[Datum::from("ab"), Datum::from("c")]).unwrap());
        assert!(!checker.check(&sc, &[Datum::from("a"), Datum::from("bc")]).unwrap());
    }

    #[test]
    fn collation_controls_case_collapse() {
        let ci = StatementContext::default().with_collation(Collation::Utf8CaseInsensitive);
        let mut checker = DistinctChecker::new();
        assert!(checker.check(&ci, &[Datum::from("Hello")]).unwrap());
        assert!(!checker.check(&ci, &[Datum::from("HELLO")]).unwrap());

        let binary = StatementContext::default();
        let mut checker = DistinctChecker::new();
        assert!(checker.check(&binary, &[Datum::from("Hello")]).unwrap());
        assert!(checker.check(&binary, &[Datum::from("HELLO")]).unwrap());
    }
}
