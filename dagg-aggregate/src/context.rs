use dagg_result::Result;
use dagg_types::{Datum, StatementContext};

use crate::distinct::DistinctChecker;

/// Mutable accumulator state for one (aggregate function, group) pair.
///
/// Created by `create_context`, mutated only by `update`, read by
/// `partial_result` and `result`, then dropped with the group. Contexts never
/// share state, so different groups may be driven from different threads.
#[derive(Clone, Debug, Default)]
pub struct EvaluationContext {
    pub(crate) count: i64,
    pub(crate) value: Datum,
    pub(crate) buffer: Option<String>,
    pub(crate) got_first_row: bool,
    pub(crate) truncated: bool,
    pub(crate) distinct_checker: Option<DistinctChecker>,
}

impl EvaluationContext {
    /// Fresh state; the distinct checker is allocated up front when requested.
    pub fn new(with_distinct: bool) -> Self {
        Self {
            distinct_checker: with_distinct.then(DistinctChecker::new),
            ..Self::default()
        }
    }

    pub(crate) fn with_value(mut self, value: Datum) -> Self {
        self.value = value;
        self
    }

    /// Running count of contributing values.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Current accumulated scalar.
    pub fn value(&self) -> &Datum {
        &self.value
    }

    /// Accumulated `GROUP_CONCAT` text, if anything was appended.
    pub fn buffer(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    pub fn got_first_row(&self) -> bool {
        self.got_first_row
    }

    /// True once `GROUP_CONCAT` output hit the configured length limit.
    ///
    /// The caller raises its one-time truncation warning from this flag.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn distinct_checker(&self) -> Option<&DistinctChecker> {
        self.distinct_checker.as_ref()
    }

    /// Consult the distinct checker, if any. Contexts without one accept every tuple.
    pub(crate) fn admit(&mut self, sc: &StatementContext, values: &[Datum]) -> Result<bool> {
        match self.distinct_checker.as_mut() {
            Some(checker) => checker.check(sc, values),
            None => Ok(true),
        }
    }
}
