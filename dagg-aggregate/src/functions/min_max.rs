use std::cmp::Ordering;

use dagg_expr::Row;
use dagg_result::Result;
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation};
use crate::context::EvaluationContext;

/// `MIN(x)` / `MAX(x)`.
///
/// `count` only marks whether a candidate exists. Partials are single
/// candidates and merge with the same compare-and-replace rule.
#[derive(Clone, Debug)]
pub struct MinMaxFunction {
    pub(crate) base: AggBase,
    is_max: bool,
}

impl MinMaxFunction {
    pub(crate) fn new(base: AggBase, is_max: bool) -> Self {
        Self { base, is_max }
    }

    pub fn is_max(&self) -> bool {
        self.is_max
    }
}

impl Aggregation for MinMaxFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base.new_context()
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        let value = self.base.eval_arg(0, row)?;
        if value.is_null() {
            return Ok(());
        }
        if ctx.count == 0 {
            ctx.value = value;
        } else {
            let wanted = if self.is_max {
                Ordering::Greater
            } else {
                Ordering::Less
            };
            if value.compare(&ctx.value, sc.collation()) == wanted {
                ctx.value = value;
            }
        }
        ctx.count += 1;
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
