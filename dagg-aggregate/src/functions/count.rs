use dagg_expr::Row;
use dagg_result::{Error, Result};
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation};
use crate::context::EvaluationContext;

/// `COUNT(x [, y ...])`: rows whose arguments are all non-null.
#[derive(Clone, Debug)]
pub struct CountFunction {
    pub(crate) base: AggBase,
}

impl CountFunction {
    pub(crate) fn new(base: AggBase) -> Self {
        Self { base }
    }
}

impl Aggregation for CountFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base.new_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        if self.base.is_final() {
            let partial = self.base.eval_arg(0, row)?;
            if partial.is_null() {
                return Ok(());
            }
            ctx.count = ctx
                .count
                .checked_add(partial.to_i64()?)
                .ok_or_else(|| Error::overflow("BIGINT"))?;
            return Ok(());
        }

        let values = self.base.eval_args(row)?;
        if values.iter().any(Datum::is_null) {
            return Ok(());
        }
        if !ctx.admit(sc, &values)? {
            return Ok(());
        }
        ctx.count += 1;
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![Datum::Int64(ctx.count)]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        Datum::Int64(ctx.count)
    }
}
