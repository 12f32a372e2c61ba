use dagg_expr::Row;
use dagg_result::Result;
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation};
use crate::context::EvaluationContext;

/// `FIRST(x)`: the value seen by the first `update` call, `NULL` included.
///
/// "First" means first call. Callers that need a particular row must present
/// rows, or partials, in that order.
#[derive(Clone, Debug)]
pub struct FirstRowFunction {
    pub(crate) base: AggBase,
}

impl FirstRowFunction {
    pub(crate) fn new(base: AggBase) -> Self {
        Self { base }
    }
}

impl Aggregation for FirstRowFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base.new_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        _sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        if ctx.got_first_row {
            return Ok(());
        }
        ctx.value = self.base.eval_arg(0, row)?;
        ctx.got_first_row = true;
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![ctx.value.clone()]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        ctx.value.clone()
    }
}
