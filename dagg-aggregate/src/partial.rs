//! Partial-result layout shared by the partial and final stages.
//!
//! Each function contributes a fixed number of columns to a partial row:
//! one for every kind except `AVG`, which ships `[sum, count]`. This arity
//! and ordering is the compatibility contract between the two stages.

use std::sync::Arc;

use arrow::datatypes::{Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use dagg_expr::ExprNode;
use dagg_result::{Error, Result};
use dagg_types::{Datum, datums_to_array};

use crate::context::EvaluationContext;
use crate::descriptor::AggFuncKind;
use crate::functions::{AggregateFunction, Aggregation};

/// Number of partial-result values `kind` emits per group.
pub fn partial_result_arity(kind: AggFuncKind) -> usize {
    match kind {
        AggFuncKind::Avg => 2,
        _ => 1,
    }
}

/// Wire node for the Final-mode counterpart of `kind`, reading its partial
/// columns starting at `first_column`.
pub fn final_mode_node(kind: AggFuncKind, first_column: usize) -> ExprNode {
    let args = (0..partial_result_arity(kind))
        .map(|i| ExprNode::column((first_column + i) as i64))
        .collect();
    ExprNode::aggregate(kind.expr_type(), args)
}

/// Collects per-group partial rows into an Arrow batch for shipping.
#[derive(Debug)]
pub struct PartialBatchBuilder {
    names: Vec<String>,
    columns: Vec<Vec<Datum>>,
    rows: usize,
}

impl PartialBatchBuilder {
    pub fn new(functions: &[AggregateFunction]) -> Self {
        let mut names = Vec::new();
        for (idx, function) in functions.iter().enumerate() {
            match function.kind() {
                AggFuncKind::Avg => {
                    names.push(format!("avg_sum_{idx}"));
                    names.push(format!("avg_count_{idx}"));
                }
                kind => names.push(format!("{}_{idx}", kind.name())),
            }
        }
        let columns = vec![Vec::new(); names.len()];
        Self {
            names,
            columns,
            rows: 0,
        }
    }

    pub fn num_columns(&self) -> usize {
        self.names.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Append one group's partial results, one context per function.
    pub fn push_group(
        &mut self,
        functions: &[AggregateFunction],
        contexts: &[EvaluationContext],
    ) -> Result<()> {
        if functions.len() != contexts.len() {
            return Err(Error::Internal(format!(
                "{} functions but {} contexts",
                functions.len(),
                contexts.len()
            )));
        }
        let row: Vec<Datum> = functions
            .iter()
            .zip(contexts)
            .flat_map(|(function, ctx)| function.partial_result(ctx))
            .collect();
        self.push_row(row)
    }

    /// Append an already-flattened partial row.
    pub fn push_row(&mut self, row: Vec<Datum>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::Internal(format!(
                "partial row has {} values, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.columns.len());
        let mut arrays = Vec::with_capacity(self.columns.len());
        for (name, values) in self.names.into_iter().zip(self.columns) {
            let array = datums_to_array(&values)?;
            fields.push(Field::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }
        let options = RecordBatchOptions::new().with_row_count(Some(self.rows));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(batch)
    }
}
