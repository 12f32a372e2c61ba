use dagg_expr::Row;
use dagg_result::Result;
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation, update_sum};
use crate::context::EvaluationContext;

/// `SUM(x)`.
///
/// A partial is the running sum; merging adds partial sums with the same
/// overflow-safe combiner used per row.
#[derive(Clone, Debug)]
pub struct SumFunction {
    pub(crate) base: AggBase,
}

impl SumFunction {
    pub(crate) fn new(base: AggBase) -> Self {
        Self { base }
    }
}

impl Aggregation for SumFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base.new_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        // Final-mode partials take the same path: a non-null fragment adds into
        // the sum and counts once. Distinct was dropped for Final at build time.
        let value = self.base.eval_arg(0, row)?;
        update_sum(ctx, sc, value)?;
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![ctx.value.clone()]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        if ctx.count > 0 {
            ctx.value.clone()
        } else {
            Datum::Null
        }
    }
}
