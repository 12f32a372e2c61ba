//! Construction of aggregate functions from descriptors or wire trees.

use std::sync::Arc;

use dagg_expr::{DefaultExprResolver, ExprNode, ExprRef, ExprResolver};
use dagg_result::{Error, Result};
use dagg_types::statement_context::DEFAULT_DIV_PRECISION_INCREMENT;
use dagg_types::{FieldType, StatementContext};

use crate::descriptor::{AggFuncKind, AggFunctionMode, AggregateDescriptor};
use crate::functions::{
    AggBase, AggregateFunction, AvgFunction, BitFunction, BitOp, CountFunction, FirstRowFunction,
    GroupConcatFunction, MinMaxFunction, SumFunction,
};

/// Build a function from an already-resolved descriptor.
///
/// `AVG` results use the default division precision increment; use
/// [`build_from_expr`] to take it from a statement context.
pub fn build(descriptor: AggregateDescriptor, mode: AggFunctionMode) -> Result<AggregateFunction> {
    build_with_increment(descriptor, mode, DEFAULT_DIV_PRECISION_INCREMENT)
}

/// Decode an aggregate call node, resolve its arguments and build it.
pub fn build_from_expr(
    node: &ExprNode,
    field_types: &[FieldType],
    sc: &StatementContext,
    mode: AggFunctionMode,
    resolver: &dyn ExprResolver,
) -> Result<AggregateFunction> {
    let kind = AggFuncKind::from_expr_type(node.tp)
        .ok_or_else(|| Error::UnrecognizedFunction(format!("{:?}", node.tp)))?;
    let args = node
        .children
        .iter()
        .map(|child| {
            resolver
                .resolve(child, field_types, sc)
                .map_err(|err| match err {
                    Error::ArgumentResolution(_) => err,
                    other => Error::argument_resolution(other),
                })
        })
        .collect::<Result<Vec<ExprRef>>>()?;
    let descriptor = AggregateDescriptor::new(kind, args, node.distinct);
    build_with_increment(descriptor, mode, sc.div_precision_increment())
}

/// Coprocessor entry point: Complete mode with the default resolver.
pub fn new_dist_agg_func(
    node: &ExprNode,
    field_types: &[FieldType],
    sc: &StatementContext,
) -> Result<AggregateFunction> {
    build_from_expr(
        node,
        field_types,
        sc,
        AggFunctionMode::Complete,
        &DefaultExprResolver,
    )
}

fn build_with_increment(
    mut descriptor: AggregateDescriptor,
    mode: AggFunctionMode,
    div_precision_increment: u8,
) -> Result<AggregateFunction> {
    let kind = descriptor.kind;
    validate_arity(kind, mode, descriptor.args.len())?;

    if descriptor.has_distinct && (!kind.supports_distinct() || mode == AggFunctionMode::Final) {
        tracing::debug!("[FACTORY] dropping DISTINCT for {} in {:?} mode", kind, mode);
        descriptor.has_distinct = false;
    }

    tracing::debug!(
        "[FACTORY] building {}: mode={:?}, args={}, distinct={}",
        kind,
        mode,
        descriptor.args.len(),
        descriptor.has_distinct
    );

    let base = AggBase::new(Arc::new(descriptor), mode);
    let function = match kind {
        AggFuncKind::Sum => AggregateFunction::Sum(SumFunction::new(base)),
        AggFuncKind::Count => AggregateFunction::Count(CountFunction::new(base)),
        AggFuncKind::Avg => AggregateFunction::Avg(AvgFunction::new(base, div_precision_increment)),
        AggFuncKind::Max => AggregateFunction::MinMax(MinMaxFunction::new(base, true)),
        AggFuncKind::Min => AggregateFunction::MinMax(MinMaxFunction::new(base, false)),
        AggFuncKind::FirstRow => AggregateFunction::FirstRow(FirstRowFunction::new(base)),
        AggFuncKind::BitOr => AggregateFunction::Bit(BitFunction::new(base, BitOp::Or)),
        AggFuncKind::BitAnd => AggregateFunction::Bit(BitFunction::new(base, BitOp::And)),
        AggFuncKind::BitXor => AggregateFunction::Bit(BitFunction::new(base, BitOp::Xor)),
        AggFuncKind::GroupConcat => AggregateFunction::GroupConcat(GroupConcatFunction::new(base)),
    };
    Ok(function)
}

fn validate_arity(kind: AggFuncKind, mode: AggFunctionMode, got: usize) -> Result<()> {
    let (min, max) = match (kind, mode) {
        (AggFuncKind::Avg, AggFunctionMode::Final) => (2, 2),
        (AggFuncKind::Count | AggFuncKind::GroupConcat, AggFunctionMode::Complete) => {
            (1, usize::MAX)
        }
        _ => (1, 1),
    };
    if got < min || got > max {
        let expected = match (min, max) {
            (min, usize::MAX) => format!("at least {min}"),
            (min, max) if min == max => format!("exactly {min}"),
            (min, max) => format!("{min} to {max}"),
        };
        return Err(Error::argument_resolution(format!(
            "{kind} in {mode:?} mode expects {expected} argument(s), got {got}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagg_expr::{ColumnRef, ExprType};
    use dagg_types::Datum;

    use crate::functions::Aggregation;

    fn col(idx: usize) -> ExprRef {
        Arc::new(ColumnRef::new(idx, FieldType::Int64))
    }

    #[test]
    fn arity_rules() {
        let sum2 = AggregateDescriptor::new(AggFuncKind::Sum, vec![col(0), col(1)], false);
        assert!(matches!(
            build(sum2, AggFunctionMode::Complete),
            Err(Error::ArgumentResolution(_))
        ));

        let avg1 = AggregateDescriptor::new(AggFuncKind::Avg, vec![col(0)], false);
        assert!(build(avg1.clone(), AggFunctionMode::Complete).is_ok());
        assert!(build(avg1, AggFunctionMode::Final).is_err());

        let count3 =
            AggregateDescriptor::new(AggFuncKind::Count, vec![col(0), col(1), col(2)], false);
        assert!(build(count3.clone(), AggFunctionMode::Complete).is_ok());
        assert!(build(count3, AggFunctionMode::Final).is_err());

        let empty = AggregateDescriptor::new(AggFuncKind::GroupConcat, Vec::new(), false);
        assert!(build(empty, AggFunctionMode::Complete).is_err());
    }

    #[test]
    fn distinct_kept_only_where_meaningful() {
        let max = AggregateDescriptor::new(AggFuncKind::Max, vec![col(0)], true);
        let f = build(max, AggFunctionMode::Complete).unwrap();
        assert!(!f.has_distinct());
        assert!(f.create_context().distinct_checker().is_none());

        let sum = AggregateDescriptor::new(AggFuncKind::Sum, vec![col(0)], true);
        let f = build(sum.clone(), AggFunctionMode::Complete).unwrap();
        assert!(f.has_distinct());
        assert!(f.create_context().distinct_checker().is_some());
        assert!(!build(sum, AggFunctionMode::Final).unwrap().has_distinct());
    }

    #[test]
    fn non_aggregate_root_is_unrecognized() {
        let sc = StatementContext::default();
        let err = new_dist_agg_func(&ExprNode::column(0), &[FieldType::Int64], &sc).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedFunction(_)));
    }

    #[test]
    fn statement_increment_reaches_avg() {
        let sc = StatementContext::default().with_div_precision_increment(1);
        let node = ExprNode::aggregate(ExprType::Avg, vec![ExprNode::column(0)]);
        let f = new_dist_agg_func(&node, &[FieldType::Int64], &sc).unwrap();
        let mut ctx = f.create_context();
        for v in [1, 2] {
            f.update(&mut ctx, &sc, &vec![Datum::Int64(v)]).unwrap();
        }
        assert_eq!(f.result(&ctx).to_string(), "1.5");
    }
}
