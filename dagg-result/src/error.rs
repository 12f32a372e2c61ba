use std::fmt;
use thiserror::Error;

/// Unified error type for all dagg operations.
///
/// Every failure raised while building or driving an aggregate function is
/// expressed through this enum. The first five variants follow the failure
/// taxonomy of the aggregation core; the rest are ambient failures shared by
/// the supporting crates.
///
/// # Error Handling Strategy
///
/// Nothing is recovered locally. Errors propagate upward with `?` and the
/// caller decides whether to abort the query or isolate the failing partition.
/// Retries operate by re-running the whole aggregation, since evaluation
/// contexts carry no resumable checkpoint.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, so a worker driving one group can hand
/// its failure to the executor thread that owns the query.
#[derive(Error, Debug)]
pub enum Error {
    /// A function descriptor named a kind outside the closed set of aggregates.
    ///
    /// Raised by the factory when the root node of a serialized descriptor is
    /// not an aggregate, or when a wire type code is unknown altogether. Fatal
    /// to construction.
    #[error("unrecognized aggregate function type: {0}")]
    UnrecognizedFunction(String),

    /// An argument expression could not be decoded or bound.
    ///
    /// This covers malformed payloads, column offsets past the end of the
    /// field-type list, unsupported argument node types and an argument count
    /// that does not fit the function kind. Fatal to construction.
    #[error("failed to resolve aggregate argument: {0}")]
    ArgumentResolution(String),

    /// Evaluating an argument expression against a row failed.
    ///
    /// The message carries whatever the expression layer reported (type
    /// mismatch, missing column, ...). Fatal to the enclosing query.
    #[error("expression evaluation error: {0}")]
    Evaluation(String),

    /// Numeric combination exceeded the representable range.
    ///
    /// Raised for fixed-width integer sums when the statement context asks for
    /// overflow rejection, and always for decimal sums past the maximum
    /// precision. The payload names the overflowing domain, e.g. `BIGINT`.
    #[error("{0} value is out of range")]
    Overflow(String),

    /// A value tuple could not be encoded into a canonical distinct key.
    #[error("distinct key encoding error: {0}")]
    Encoding(String),

    /// A value could not be coerced into the domain an aggregate needs.
    ///
    /// For example summing text that does not parse as a number, or feeding
    /// a non-integral string to a bitwise aggregate.
    #[error("expression cast error: {0}")]
    ExprCast(String),

    /// Invalid user input or API parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Arrow library error while materializing or reading partial batches.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an overflow error naming the overflowing domain.
    ///
    /// ```
    /// use dagg_result::Error;
    ///
    /// let err = Error::overflow("BIGINT");
    /// assert_eq!(err.to_string(), "BIGINT value is out of range");
    /// ```
    #[inline]
    pub fn overflow<E: fmt::Display>(domain: E) -> Self {
        Error::Overflow(domain.to_string())
    }

    /// Create an expression cast error from any displayable error.
    ///
    /// ```
    /// use dagg_result::Error;
    ///
    /// fn parse_number(input: &str) -> Result<u32, Error> {
    ///     input.parse::<u32>().map_err(Error::expr_cast)
    /// }
    ///
    /// assert_eq!(parse_number("42").unwrap(), 42);
    /// assert!(matches!(parse_number("abc"), Err(Error::ExprCast(_))));
    /// ```
    #[inline]
    pub fn expr_cast<E: fmt::Display>(err: E) -> Self {
        Error::ExprCast(err.to_string())
    }

    /// Create an evaluation error from any displayable error.
    #[inline]
    pub fn evaluation<E: fmt::Display>(err: E) -> Self {
        Error::Evaluation(err.to_string())
    }

    /// Create a distinct-key encoding error from any displayable error.
    #[inline]
    pub fn encoding<E: fmt::Display>(err: E) -> Self {
        Error::Encoding(err.to_string())
    }

    /// Create an argument resolution error from any displayable error.
    #[inline]
    pub fn argument_resolution<E: fmt::Display>(err: E) -> Self {
        Error::ArgumentResolution(err.to_string())
    }

    /// True when the error is a numeric range failure.
    #[inline]
    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow(_))
    }
}
