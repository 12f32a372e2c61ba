use dagg_expr::Row;
use dagg_result::Result;
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation};
use crate::context::EvaluationContext;

/// `GROUP_CONCAT(x [, y ...])`.
///
/// Arguments of one row are concatenated without a separator; contributions
/// are joined with the statement's separator. Output is cut at
/// `group_concat_max_len` bytes (on a character boundary) and later appends
/// are ignored.
#[derive(Clone, Debug)]
pub struct GroupConcatFunction {
    pub(crate) base: AggBase,
}

impl GroupConcatFunction {
    pub(crate) fn new(base: AggBase) -> Self {
        Self { base }
    }

    fn append(&self, ctx: &mut EvaluationContext, sc: &StatementContext, piece: &str) {
        if ctx.truncated {
            return;
        }
        let first = ctx.buffer.is_none();
        let buffer = ctx.buffer.get_or_insert_with(String::new);
        if !first {
            buffer.push_str(sc.group_concat_separator());
        }
        buffer.push_str(piece);
        ctx.count += 1;

        let max_len = usize::try_from(sc.group_concat_max_len()).unwrap_or(usize::MAX);
        if max_len > 0 && buffer.len() > max_len {
            let mut cut = max_len;
            while !buffer.is_char_boundary(cut) {
                cut -= 1;
            }
            buffer.truncate(cut);
            ctx.truncated = true;
            tracing::debug!(
                "[GROUP_CONCAT] output truncated: max_len={}, kept={} bytes",
                max_len,
                cut
            );
        }
    }
}

impl Aggregation for GroupConcatFunction {
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
            let fragment = self.base.eval_arg(0, row)?;
            if !fragment.is_null() {
                self.append(ctx, sc, &fragment.as_text());
            }
            return Ok(());
        }

        let values = self.base.eval_args(row)?;
        if values.iter().any(Datum::is_null) {
            return Ok(());
        }
        if !ctx.admit(sc, &values)? {
            return Ok(());
        }
        let piece: String = values.iter().map(|v| v.as_text()).collect();
        self.append(ctx, sc, &piece);
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![self.result(ctx)]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        match &ctx.buffer {
            Some(text) => Datum::String(text.clone()),
            None => Datum::Null,
        }
    }
}
