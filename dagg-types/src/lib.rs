//! Value model shared by every dagg crate.
//!
//! - [`Datum`]: a single SQL scalar, with exact/float/text/binary families.
//! - [`DecimalValue`]: Decimal128-style exact numeric.
//! - [`FieldType`]: declared column types for argument resolution.
//! - [`StatementContext`]: per-statement runtime flags.
//! - [`key`]: canonical byte keys for DISTINCT membership.
//! - [`internal`]: the order-preserving codecs the keys are built from.

pub mod internal;

pub mod errors;
pub use errors::*;

pub mod array;
pub mod datum;
pub mod decimal;
pub mod field_type;
pub mod key;
pub mod statement_context;

pub use array::datums_to_array;
pub use datum::Datum;
pub use decimal::{DecimalError, DecimalValue, MAX_DECIMAL_PRECISION};
pub use field_type::FieldType;
pub use key::{encode_key, encode_key_to_vec};
pub use statement_context::{Collation, StatementContext};
