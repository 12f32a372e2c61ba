//! Aggregate function evaluation for a two-stage (partial/final) engine.
//!
//! A function is built once per query from an [`AggregateDescriptor`] or a
//! wire [`dagg_expr::ExprNode`], then driven over any number of groups, each
//! owning its own [`EvaluationContext`]. Partial results from many workers
//! are merged by a Final-mode function reading the partial columns.

pub mod context;
pub mod descriptor;
pub mod distinct;
pub mod factory;
pub mod functions;
pub mod partial;
pub mod stream;

pub use context::EvaluationContext;
pub use descriptor::{AggFuncKind, AggFunctionMode, AggregateDescriptor};
pub use distinct::DistinctChecker;
pub use factory::{build, build_from_expr, new_dist_agg_func};
pub use functions::{AggregateFunction, Aggregation, BitOp};
pub use partial::{PartialBatchBuilder, final_mode_node, partial_result_arity};
pub use stream::GroupAggregator;

use dagg_result::Error;

pub type AggregateResult<T> = Result<T, Error>;
