//! Aggregate function kinds and their shared four-operation contract.

use std::sync::Arc;

use dagg_expr::{Row, eval_args};
use dagg_result::{Error, Result};
use dagg_types::{Datum, StatementContext};

use crate::context::EvaluationContext;
use crate::descriptor::{AggFuncKind, AggFunctionMode, AggregateDescriptor};

mod avg;
mod bit_ops;
mod count;
mod first_row;
mod group_concat;
mod min_max;
mod sum;

pub use avg::AvgFunction;
pub use bit_ops::{BitFunction, BitOp};
pub use count::CountFunction;
pub use first_row::FirstRowFunction;
pub use group_concat::GroupConcatFunction;
pub use min_max::MinMaxFunction;
pub use sum::SumFunction;

/// The contract every aggregate kind implements.
///
/// In Complete mode `update` receives input rows; in Final mode it receives
/// rows laid out like [`Aggregation::partial_result`] and merges them with the
/// same combine rule. `partial_result` and `result` are pure reads.
pub trait Aggregation {
    fn create_context(&self) -> EvaluationContext;

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()>;

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum>;

    fn result(&self, ctx: &EvaluationContext) -> Datum;
}

/// Descriptor and mode shared by every kind.
#[derive(Clone, Debug)]
pub(crate) struct AggBase {
    descriptor: Arc<AggregateDescriptor>,
    mode: AggFunctionMode,
}

impl AggBase {
    pub(crate) fn new(descriptor: Arc<AggregateDescriptor>, mode: AggFunctionMode) -> Self {
        Self { descriptor, mode }
    }

    #[inline]
    pub(crate) fn is_final(&self) -> bool {
        self.mode == AggFunctionMode::Final
    }

    pub(crate) fn new_context(&self) -> EvaluationContext {
        EvaluationContext::new(self.descriptor.has_distinct)
    }

    pub(crate) fn eval_args(&self, row: &dyn Row) -> Result<Vec<Datum>> {
        eval_args(&self.descriptor.args, row)
    }

    /// Evaluate argument `idx`; arity was validated at construction.
    pub(crate) fn eval_arg(&self, idx: usize, row: &dyn Row) -> Result<Datum> {
        let arg = self.descriptor.args.get(idx).ok_or_else(|| {
            Error::Internal(format!(
                "{} has no argument {idx}",
                self.descriptor.kind.name()
            ))
        })?;
        arg.eval(row)
    }
}

/// Shared SUM step, reused by AVG: skip NULL, consult DISTINCT, add, count.
pub(crate) fn update_sum(
    ctx: &mut EvaluationContext,
    sc: &StatementContext,
    value: Datum,
) -> Result<bool> {
    if value.is_null() {
        return Ok(false);
    }
    if !ctx.admit(sc, std::slice::from_ref(&value))? {
        return Ok(false);
    }
    ctx.value = dagg_compute::calculate_sum(sc, &ctx.value, &value)?;
    ctx.count += 1;
    Ok(true)
}

/// A ready-to-run aggregate function, one variant per kind.
#[derive(Clone, Debug)]
pub enum AggregateFunction {
    Sum(SumFunction),
    Count(CountFunction),
    Avg(AvgFunction),
    MinMax(MinMaxFunction),
    FirstRow(FirstRowFunction),
    Bit(BitFunction),
    GroupConcat(GroupConcatFunction),
}

impl AggregateFunction {
    fn inner(&self) -> &dyn Aggregation {
        match self {
            AggregateFunction::Sum(f) => f,
            AggregateFunction::Count(f) => f,
            AggregateFunction::Avg(f) => f,
            AggregateFunction::MinMax(f) => f,
            AggregateFunction::FirstRow(f) => f,
            AggregateFunction::Bit(f) => f,
            AggregateFunction::GroupConcat(f) => f,
        }
    }

    fn base(&self) -> &AggBase {
        match self {
            AggregateFunction::Sum(f) => &f.base,
            AggregateFunction::Count(f) => &f.base,
            AggregateFunction::Avg(f) => &f.base,
            AggregateFunction::MinMax(f) => &f.base,
            AggregateFunction::FirstRow(f) => &f.base,
            AggregateFunction::Bit(f) => &f.base,
            AggregateFunction::GroupConcat(f) => &f.base,
        }
    }

    pub fn kind(&self) -> AggFuncKind {
        self.base().descriptor.kind
    }

    pub fn mode(&self) -> AggFunctionMode {
        self.base().mode
    }

    pub fn descriptor(&self) -> &Arc<AggregateDescriptor> {
        &self.base().descriptor
    }

    pub fn has_distinct(&self) -> bool {
        self.base().descriptor.has_distinct
    }

    /// Number of values [`Aggregation::partial_result`] emits for this kind.
    pub fn partial_arity(&self) -> usize {
        crate::partial::partial_result_arity(self.kind())
    }
}

impl Aggregation for AggregateFunction {
    fn create_context(&self) -> EvaluationContext {
        self.inner().create_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        self.inner().update(ctx, sc, row)
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        self.inner().partial_result(ctx)
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        self.inner().result(ctx)
    }
}
