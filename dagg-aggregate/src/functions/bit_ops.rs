use dagg_expr::Row;
use dagg_result::{Error, Result};
use dagg_types::{Datum, StatementContext};

use super::{AggBase, Aggregation};
use crate::context::EvaluationContext;

/// Bitwise operator folded by [`BitFunction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitOp {
    Or,
    And,
    Xor,
}

impl BitOp {
    /// Starting accumulator; also the result for a group with no rows.
    pub fn identity(self) -> u64 {
        match self {
            BitOp::Or | BitOp::Xor => 0,
            BitOp::And => u64::MAX,
        }
    }

    #[inline]
    pub fn apply(self, acc: u64, operand: u64) -> u64 {
        match self {
            BitOp::Or => acc | operand,
            BitOp::And => acc & operand,
            BitOp::Xor => acc ^ operand,
        }
    }
}

/// `BIT_OR(x)`, `BIT_AND(x)`, `BIT_XOR(x)` over 64-bit unsigned operands.
#[derive(Clone, Debug)]
pub struct BitFunction {
    pub(crate) base: AggBase,
    op: BitOp,
}

impl BitFunction {
    pub(crate) fn new(base: AggBase, op: BitOp) -> Self {
        Self { base, op }
    }

    pub fn op(&self) -> BitOp {
        self.op
    }
}

impl Aggregation for BitFunction {
    fn create_context(&self) -> EvaluationContext {
        self.base
            .new_context()
            .with_value(Datum::UInt64(self.op.identity()))
    }

    fn update(
        &self,
        ctx: &mut EvaluationContext,
        _sc: &StatementContext,
        row: &dyn Row,
    ) -> Result<()> {
        let value = self.base.eval_arg(0, row)?;
        if value.is_null() {
            return Ok(());
        }
        let operand = value.to_bit_operand()?;
        let acc = match ctx.value {
            Datum::UInt64(acc) => acc,
            ref other => {
                return Err(Error::Internal(format!(
                    "bitwise accumulator holds {} instead of BIGINT UNSIGNED",
                    other.type_name()
                )));
            }
        };
        ctx.value = Datum::UInt64(self.op.apply(acc, operand));
        ctx.count += 1;
        Ok(())
    }

    fn partial_result(&self, ctx: &EvaluationContext) -> Vec<Datum> {
        vec![ctx.value.clone()]
    }

    fn result(&self, ctx: &EvaluationContext) -> Datum {
        ctx.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_neutral() {
        for op in [BitOp::Or, BitOp::And, BitOp::Xor] {
            for v in [0u64, 1, 0xdead_beef, u64::MAX] {
                assert_eq!(op.apply(op.identity(), v), v);
            }
        }
    }
}
