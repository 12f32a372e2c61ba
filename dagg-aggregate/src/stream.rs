//! Per-group accumulation over a set of aggregate functions.

use arrow::record_batch::RecordBatch;
use dagg_expr::{BatchRow, Row};
use dagg_result::{Error, Result};
use dagg_types::{Datum, StatementContext, encode_key_to_vec};
use rustc_hash::FxHashMap;

use crate::context::EvaluationContext;
use crate::functions::{AggregateFunction, Aggregation};
use crate::partial::PartialBatchBuilder;

/// Owns one evaluation context per (function, group) pair.
///
/// Groups are identified by opaque byte keys and reported in first-seen
/// order. Each group's contexts are created lazily on its first row.
#[derive(Debug)]
pub struct GroupAggregator {
    functions: Vec<AggregateFunction>,
    groups: FxHashMap<Vec<u8>, usize>,
    keys: Vec<Vec<u8>>,
    contexts: Vec<Vec<EvaluationContext>>,
}

impl GroupAggregator {
    pub fn new(functions: Vec<AggregateFunction>) -> Self {
        Self {
            functions,
            groups: FxHashMap::default(),
            keys: Vec::new(),
            contexts: Vec::new(),
        }
    }

    pub fn functions(&self) -> &[AggregateFunction] {
        &self.functions
    }

    pub fn num_groups(&self) -> usize {
        self.keys.len()
    }

    fn group_slot(&mut self, key: &[u8]) -> usize {
        if let Some(&slot) = self.groups.get(key) {
            return slot;
        }
        let slot = self.keys.len();
        tracing::trace!("[GROUP] new group: slot={}, key_len={}", slot, key.len());
        self.groups.insert(key.to_vec(), slot);
        self.keys.push(key.to_vec());
        self.contexts
            .push(self.functions.iter().map(|f| f.create_context()).collect());
        slot
    }

    /// Feed one row into every function for the group `key`.
    pub fn update(&mut self, key: &[u8], sc: &StatementContext, row: &dyn Row) -> Result<()> {
        let slot = self.group_slot(key);
        let contexts = &mut self.contexts[slot];
        for (function, ctx) in self.functions.iter().zip(contexts.iter_mut()) {
            function.update(ctx, sc, row)?;
        }
        Ok(())
    }

    /// Feed every row of `batch`, grouping on the values of `group_columns`.
    ///
    /// An empty `group_columns` puts every row into a single group.
    pub fn update_batch(
        &mut self,
        sc: &StatementContext,
        batch: &RecordBatch,
        group_columns: &[usize],
    ) -> Result<()> {
        tracing::debug!(
            "[GROUP] update_batch: rows={}, group_columns={:?}",
            batch.num_rows(),
            group_columns
        );
        let mut key_values = Vec::with_capacity(group_columns.len());
        for row in BatchRow::iter(batch) {
            key_values.clear();
            for &col in group_columns {
                key_values.push(row.datum(col)?);
            }
            let key = encode_key_to_vec(&key_values, sc.collation())?;
            self.update(&key, sc, &row)?;
        }
        Ok(())
    }

    /// Group keys in first-seen order.
    pub fn group_keys(&self) -> impl Iterator<Item = &[u8]> {
        self.keys.iter().map(Vec::as_slice)
    }

    pub fn contexts(&self, key: &[u8]) -> Option<&[EvaluationContext]> {
        self.groups
            .get(key)
            .map(|&slot| self.contexts[slot].as_slice())
    }

    /// Partial results of every group, one row per group.
    pub fn partial_batch(&self) -> Result<RecordBatch> {
        let mut builder = PartialBatchBuilder::new(&self.functions);
        for contexts in &self.contexts {
            builder.push_group(&self.functions, contexts)?;
        }
        builder.finish()
    }

    /// Final results per group, in first-seen order.
    pub fn results(&self) -> Vec<(Vec<u8>, Vec<Datum>)> {
        self.keys
            .iter()
            .zip(&self.contexts)
            .map(|(key, contexts)| {
                let values = self
                    .functions
                    .iter()
                    .zip(contexts)
                    .map(|(function, ctx)| function.result(ctx))
                    .collect();
                (key.clone(), values)
            })
            .collect()
    }

    /// Final results of a grouping-free aggregation.
    ///
    /// With no input rows the functions report their empty-group values.
    pub fn scalar_results(&self) -> Result<Vec<Datum>> {
        match self.contexts.len() {
            0 => Ok(self
                .functions
                .iter()
                .map(|f| f.result(&f.create_context()))
                .collect()),
            1 => Ok(self
                .functions
                .iter()
                .zip(&self.contexts[0])
                .map(|(function, ctx)| function.result(ctx))
                .collect()),
            n => Err(Error::InvalidArgumentError(format!(
                "scalar results requested over {n} groups"
            ))),
        }
    }
}
