//! Expression boundary consumed by aggregate functions.
//!
//! Aggregates never look at rows directly. They hold [`ExprRef`] arguments
//! produced by an [`ExprResolver`] from a serialized [`ExprNode`] tree and a
//! list of declared input [`FieldType`](dagg_types::FieldType)s, and evaluate
//! those against any [`Row`] implementation.

pub mod coerce;
pub mod expression;
pub mod node;
pub mod resolver;
pub mod row;

pub use coerce::coerce_datum;
pub use expression::{ColumnRef, Constant, ExprRef, Expression, eval_args};
pub use node::{ExprNode, ExprType};
pub use resolver::{DefaultExprResolver, ExprResolver};
pub use row::{BatchRow, Row};
