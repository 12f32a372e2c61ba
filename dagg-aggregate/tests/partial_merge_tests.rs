use std::sync::Arc;

use arrow::array::{ArrayRef, Decimal128Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dagg_aggregate::{
    AggFuncKind, AggFunctionMode, AggregateDescriptor, AggregateFunction, Aggregation,
    EvaluationContext, GroupAggregator, PartialBatchBuilder, build, build_from_expr,
    final_mode_node, new_dist_agg_func, partial_result_arity,
};
use dagg_expr::{BatchRow, ColumnRef, DefaultExprResolver, ExprNode, ExprRef, ExprType};
use dagg_types::{Datum, FieldType, StatementContext};

fn column(idx: usize, field_type: FieldType) -> ExprRef {
    Arc::new(ColumnRef::new(idx, field_type))
}

fn partial_fn(kind: AggFuncKind, field_type: FieldType, distinct: bool) -> AggregateFunction {
    build(
        AggregateDescriptor::new(kind, vec![column(0, field_type)], distinct),
        AggFunctionMode::Complete,
    )
    .unwrap()
}

/// Final-mode counterpart reading its partial columns from offset 0.
fn final_fn(kind: AggFuncKind, partial_types: &[FieldType]) -> AggregateFunction {
    let args = partial_types
        .iter()
        .enumerate()
        .map(|(i, ft)| column(i, *ft))
        .collect();
    build(AggregateDescriptor::new(kind, args, false), AggFunctionMode::Final).unwrap()
}

fn accumulate(f: &AggregateFunction, sc: &StatementContext, rows: &[i64]) -> EvaluationContext {
    let mut ctx = f.create_context();
    for v in rows {
        f.update(&mut ctx, sc, &vec![Datum::Int64(*v)]).unwrap();
    }
    ctx
}

fn merge(
    final_f: &AggregateFunction,
    partial_f: &AggregateFunction,
    sc: &StatementContext,
    parts: &[EvaluationContext],
) -> Datum {
    let mut ctx = final_f.create_context();
    for part in parts {
        final_f
            .update(&mut ctx, sc, &partial_f.partial_result(part))
            .unwrap();
    }
    final_f.result(&ctx)
}

#[test]
fn avg_partials_merge_to_scaled_decimal() {
    let sc = StatementContext::default();
    let final_avg = final_fn(AggFuncKind::Avg, &[FieldType::Int64, FieldType::Int64]);
    let mut ctx = final_avg.create_context();
    final_avg
        .update(&mut ctx, &sc, &vec![Datum::Int64(10), Datum::Int64(2)])
        .unwrap();
    final_avg
        .update(&mut ctx, &sc, &vec![Datum::Int64(20), Datum::Int64(3)])
        .unwrap();
    assert_eq!(final_avg.result(&ctx).to_string(), "6.0000");

    // an empty partial contributes nothing
    final_avg
        .update(&mut ctx, &sc, &vec![Datum::Null, Datum::Int64(0)])
        .unwrap();
    assert_eq!(ctx.count(), 5);
}

#[test]
fn partial_shapes() {
    let sc = StatementContext::default();
    let avg = partial_fn(AggFuncKind::Avg, FieldType::Int64, false);
    let ctx = accumulate(&avg, &sc, &[4, 6]);
    assert_eq!(avg.partial_result(&ctx), vec![Datum::Int64(10), Datum::Int64(2)]);
    assert_eq!(avg.partial_arity(), partial_result_arity(AggFuncKind::Avg));

    let empty = avg.create_context();
    assert_eq!(avg.partial_result(&empty), vec![Datum::Null, Datum::Int64(0)]);

    let count = partial_fn(AggFuncKind::Count, FieldType::Int64, false);
    assert_eq!(count.partial_result(&count.create_context()), vec![Datum::Int64(0)]);
}

#[test]
fn merging_random_splits_matches_single_stage() {
    let sc = StatementContext::default();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let kinds = [
        AggFuncKind::Sum,
        AggFuncKind::Count,
        AggFuncKind::Avg,
        AggFuncKind::Max,
        AggFuncKind::Min,
        AggFuncKind::BitOr,
        AggFuncKind::BitAnd,
        AggFuncKind::BitXor,
    ];

    for round in 0..20 {
        let len = rng.random_range(1..200);
        let values: Vec<i64> = (0..len).map(|_| rng.random_range(-1_000..1_000)).collect();
        let mut cuts: Vec<usize> = (0..rng.random_range(0..5))
            .map(|_| rng.random_range(0..=len))
            .collect();
        cuts.push(0);
        cuts.push(len);
        cuts.sort_unstable();

        for kind in kinds {
            let partial = partial_fn(kind, FieldType::Int64, false);
            let expected = partial.result(&accumulate(&partial, &sc, &values));

            let parts: Vec<EvaluationContext> = cuts
                .windows(2)
                .map(|w| accumulate(&partial, &sc, &values[w[0]..w[1]]))
                .collect();
            let partial_types = vec![FieldType::Int64; partial_result_arity(kind)];
            let partial_types = match kind {
                AggFuncKind::BitOr | AggFuncKind::BitAnd | AggFuncKind::BitXor => {
                    vec![FieldType::UInt64]
                }
                _ => partial_types,
            };
            let final_f = final_fn(kind, &partial_types);
            assert_eq!(
                merge(&final_f, &partial, &sc, &parts),
                expected,
                "round {round}, {kind}"
            );
        }
    }
}

#[test]
fn group_concat_partials_keep_order_and_limit() {
    let sc = StatementContext::default().with_group_concat_max_len(5);
    let partial = partial_fn(AggFuncKind::GroupConcat, FieldType::Utf8, false);
    let final_f = final_fn(AggFuncKind::GroupConcat, &[FieldType::Utf8]);

    let mut left = partial.create_context();
    for v in ["a", "b"] {
        partial.update(&mut left, &sc, &vec![Datum::from(v)]).unwrap();
    }
    let mut right = partial.create_context();
    partial.update(&mut right, &sc, &vec![Datum::from("c")]).unwrap();
    let empty = partial.create_context();

    assert_eq!(
        merge(&final_f, &partial, &sc, &[left.clone(), empty, right.clone()]),
        Datum::from("a,b,c")
    );
    let mut d = partial.create_context();
    partial.update(&mut d, &sc, &vec![Datum::from("dd")]).unwrap();
    assert_eq!(
        merge(&final_f, &partial, &sc, &[left, right, d]),
        Datum::from("a,b,c")
    );
}

#[test]
fn first_row_takes_first_partial() {
    let sc = StatementContext::default();
    let partial = partial_fn(AggFuncKind::FirstRow, FieldType::Int64, false);
    let final_f = final_fn(AggFuncKind::FirstRow, &[FieldType::Int64]);
    let parts = [accumulate(&partial, &sc, &[7, 8]), accumulate(&partial, &sc, &[9])];
    assert_eq!(merge(&final_f, &partial, &sc, &parts), Datum::Int64(7));
}

#[test]
fn avg_decimal_rounds_half_away_from_zero() {
    // 10.51 and 10.52 average to 10.515, which must round to 10.52.
    let array = Decimal128Array::from(vec![1051, 1052])
        .with_precision_and_scale(10, 2)
        .unwrap();
    let batch = RecordBatch::try_from_iter(vec![("a", Arc::new(array) as ArrayRef)]).unwrap();
    let decimal = FieldType::Decimal { precision: 10, scale: 2 };
    let sc = StatementContext::default().with_div_precision_increment(0);

    let node = ExprNode::aggregate(ExprType::Avg, vec![ExprNode::column(0)]);
    let avg = new_dist_agg_func(&node, &[decimal], &sc).unwrap();
    let mut ctx = avg.create_context();
    for row in BatchRow::iter(&batch) {
        avg.update(&mut ctx, &sc, &row).unwrap();
    }
    let expect_1052 = |value: Datum| match value {
        Datum::Decimal(d) => {
            assert_eq!(d.raw_value(), 1052);
            assert_eq!(d.scale(), 2);
        }
        other => panic!("expected DECIMAL, got {other:?}"),
    };
    expect_1052(avg.result(&ctx));

    // ship the partial through an Arrow batch and finish it on the other side
    let functions = std::slice::from_ref(&avg);
    let mut builder = PartialBatchBuilder::new(functions);
    builder.push_group(functions, std::slice::from_ref(&ctx)).unwrap();
    let partials = builder.finish().unwrap();
    assert_eq!(partials.num_columns(), 2);

    let final_avg = build_from_expr(
        &final_mode_node(AggFuncKind::Avg, 0),
        &[decimal, FieldType::Int64],
        &sc,
        AggFunctionMode::Final,
        &DefaultExprResolver,
    )
    .unwrap();
    let mut merged = final_avg.create_context();
    for row in BatchRow::iter(&partials) {
        final_avg.update(&mut merged, &sc, &row).unwrap();
    }
    expect_1052(final_avg.result(&merged));
}

#[test]
fn group_aggregator_keeps_first_seen_order() {
    let sc = StatementContext::default();
    let batch = RecordBatch::try_from_iter(vec![
        (
            "k",
            Arc::new(StringArray::from(vec!["b", "a", "b", "c", "a"])) as ArrayRef,
        ),
        (
            "v",
            Arc::new(Int64Array::from(vec![Some(1), Some(2), Some(3), None, Some(5)])) as ArrayRef,
        ),
    ])
    .unwrap();

    let v = || vec![column(1, FieldType::Int64)];
    let functions = vec![
        build(AggregateDescriptor::new(AggFuncKind::Sum, v(), false), AggFunctionMode::Complete)
            .unwrap(),
        build(AggregateDescriptor::new(AggFuncKind::Avg, v(), false), AggFunctionMode::Complete)
            .unwrap(),
    ];
    let mut agg = GroupAggregator::new(functions);
    agg.update_batch(&sc, &batch, &[0]).unwrap();
    assert_eq!(agg.num_groups(), 3);

    let results = agg.results();
    let sums: Vec<Datum> = results.iter().map(|(_, vals)| vals[0].clone()).collect();
    assert_eq!(sums, vec![Datum::Int64(4), Datum::Int64(7), Datum::Null]);
    assert_eq!(results[1].1[1].to_string(), "3.5000");

    let partials = agg.partial_batch().unwrap();
    assert_eq!(partials.num_rows(), 3);
    assert_eq!(partials.num_columns(), 3);
    assert_eq!(
        Datum::from_array(partials.column(2), 2).unwrap(),
        Datum::Int64(0)
    );
}

#[test]
fn scalar_aggregation_without_rows() {
    let sc = StatementContext::default();
    let count = partial_fn(AggFuncKind::Count, FieldType::Int64, false);
    let agg = GroupAggregator::new(vec![count]);
    assert_eq!(agg.scalar_results().unwrap(), vec![Datum::Int64(0)]);

    let mut agg =
        GroupAggregator::new(vec![partial_fn(AggFuncKind::Count, FieldType::Int64, false)]);
    agg.update(b"x", &sc, &vec![Datum::Int64(1)]).unwrap();
    agg.update(b"y", &sc, &vec![Datum::Int64(1)]).unwrap();
    assert!(agg.scalar_results().is_err());
}

#[test]
fn out_of_range_float_partial_counts_are_rejected() {
    let sc = StatementContext::default();
    let count = final_fn(AggFuncKind::Count, &[FieldType::Float64]);
    let mut ctx = count.create_context();
    count.update(&mut ctx, &sc, &vec![Datum::Float64(2.0)]).unwrap();
    let err = count
        .update(&mut ctx, &sc, &vec![Datum::Float64(1e30)])
        .unwrap_err();
    assert!(err.is_overflow());
    assert_eq!(count.result(&ctx), Datum::Int64(2));

    let avg = final_fn(AggFuncKind::Avg, &[FieldType::Int64, FieldType::Float64]);
    let mut ctx = avg.create_context();
    let err = avg
        .update(&mut ctx, &sc, &vec![Datum::Int64(10), Datum::Float64(-1e30)])
        .unwrap_err();
    assert!(err.is_overflow());
    assert_eq!(ctx.count(), 0);
}
