//! Per-statement runtime configuration threaded through every aggregate update.

/// Default byte limit for `GROUP_CONCAT` output.
pub const DEFAULT_GROUP_CONCAT_MAX_LEN: u64 = 1024;
/// Default separator written between `GROUP_CONCAT` contributions.
pub const DEFAULT_GROUP_CONCAT_SEPARATOR: &str = ",";
/// Default number of extra fractional digits produced by `AVG` over exact numerics.
pub const DEFAULT_DIV_PRECISION_INCREMENT: u8 = 4;
/// Upper bound on the fractional digits of a division result.
pub const MAX_DIV_RESULT_SCALE: u8 = 30;

/// String comparison rules used for `MIN`/`MAX` and distinct keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Collation {
    /// Compare UTF-8 bytes as-is.
    #[default]
    Binary,
    /// Compare after NFKC normalization and Unicode default case folding.
    Utf8CaseInsensitive,
}

/// Runtime flags consulted while aggregating.
///
/// Cloned into each worker that drives groups for the statement; all fields
/// are read-only once aggregation starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementContext {
    overflow_as_error: bool,
    group_concat_max_len: u64,
    group_concat_separator: String,
    collation: Collation,
    div_precision_increment: u8,
}

impl Default for StatementContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementContext {
    /// Construct a context with default settings.
    pub fn new() -> Self {
        Self {
            overflow_as_error: false,
            group_concat_max_len: DEFAULT_GROUP_CONCAT_MAX_LEN,
            group_concat_separator: DEFAULT_GROUP_CONCAT_SEPARATOR.to_owned(),
            collation: Collation::Binary,
            div_precision_increment: DEFAULT_DIV_PRECISION_INCREMENT,
        }
    }

    /// Reject fixed-width integer overflow instead of promoting to DECIMAL.
    pub fn with_overflow_as_error(mut self, enabled: bool) -> Self {
        self.overflow_as_error = enabled;
        self
    }

    /// Byte limit for `GROUP_CONCAT`; `0` disables truncation.
    pub fn with_group_concat_max_len(mut self, max_len: u64) -> Self {
        self.group_concat_max_len = max_len;
        self
    }

    pub fn with_group_concat_separator(mut self, separator: impl Into<String>) -> Self {
        self.group_concat_separator = separator.into();
        self
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }

    /// Extra fractional digits for `AVG` results, capped so the result scale
    /// never exceeds [`MAX_DIV_RESULT_SCALE`].
    pub fn with_div_precision_increment(mut self, increment: u8) -> Self {
        self.div_precision_increment = increment.min(MAX_DIV_RESULT_SCALE);
        self
    }

    #[inline]
    pub fn overflow_as_error(&self) -> bool {
        self.overflow_as_error
    }

    #[inline]
    pub fn group_concat_max_len(&self) -> u64 {
        self.group_concat_max_len
    }

    #[inline]
    pub fn group_concat_separator(&self) -> &str {
        &self.group_concat_separator
    }

    #[inline]
    pub fn collation(&self) -> Collation {
        self.collation
    }

    #[inline]
    pub fn div_precision_increment(&self) -> u8 {
        self.div_precision_increment
    }
}
