use dagg_compute::{average, calculate_sum};
use dagg_expr::Row;
use dagg_result::{Error, Result};
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation, update_sum};
use crate::context::EvaluationContext;

/// `AVG(x)`, kept as a (sum, count) pair until the final division.
///
/// The partial shape is exactly `[sum, count]`; a Final-mode instance takes
/// those two columns as its two arguments.
#[derive(Clone, Debug)]
pub struct AvgFunction {
    pub(crate) base: AggBase,
    div_precision_increment: u8,
}

impl AvgFunction {
    pub(crate) fn new(base: AggBase, div_precision_increment: u8) -> Self {
        Self {
            base,
            div_precision_increment,
        }
    }
}

impl Aggregation for AvgFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base.new_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        if !self.base.is_final() {
            let value = self.base.eval_arg(0, row)?;
            update_sum(ctx, sc, value)?;
            return Ok(());
        }

        let partial_sum = self.base.eval_arg(0, row)?;
        let partial_count = self.base.eval_arg(1, row)?;
        if partial_count.is_null() {
            return Ok(());
        }
        let partial_count = partial_count.to_i64()?;
        if partial_count == 0 {
            return Ok(());
        }
        if !partial_sum.is_null() {
            ctx.value = calculate_sum(sc, &ctx.value, &partial_sum)?;
        }
        ctx.count = ctx
            .count
            .checked_add(partial_count)
            .ok_or_else(|| Error::overflow("BIGINT"))?;
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![ctx.value.clone(), Datum::Int64(ctx.count)]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        average(&ctx.value, ctx.count, self.div_precision_increment)
    }
}
