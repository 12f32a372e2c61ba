use arrow::record_batch::RecordBatch;
use dagg_result::{Error, Result};
use dagg_types::Datum;

/// Positional access to the values of one input row.
///
/// In Complete mode a row carries raw column values; in Final mode it carries
/// the partial-result values emitted by an upstream stage.
pub trait Row {
    fn len(&self) -> usize;

    fn datum(&self, idx: usize) -> Result<Datum>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn out_of_range(idx: usize, len: usize) -> Error {
    Error::evaluation(format!("column {idx} out of range for row of width {len}"))
}

impl Row for [Datum] {
    fn len(&self) -> usize {
        <[Datum]>::len(self)
    }

    fn datum(&self, idx: usize) -> Result<Datum> {
        self.get(idx)
            .cloned()
            .ok_or_else(|| out_of_range(idx, <[Datum]>::len(self)))
    }
}

impl Row for Vec<Datum> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn datum(&self, idx: usize) -> Result<Datum> {
        Row::datum(self.as_slice(), idx)
    }
}

/// A single row of an Arrow batch.
#[derive(Clone, Copy, Debug)]
pub struct BatchRow<'a> {
    batch: &'a RecordBatch,
    row: usize,
}

impl<'a> BatchRow<'a> {
    pub fn new(batch: &'a RecordBatch, row: usize) -> Result<Self> {
        if row >= batch.num_rows() {
            return Err(Error::InvalidArgumentError(format!(
                "row {row} out of bounds for batch of {} rows",
                batch.num_rows()
            )));
        }
        Ok(Self { batch, row })
    }

    /// Iterate every row of `batch`.
    pub fn iter(batch: &'a RecordBatch) -> impl Iterator<Item = BatchRow<'a>> + 'a {
        (0..batch.num_rows()).map(move |row| BatchRow { batch, row })
    }

    #[inline]
    pub fn row_index(&self) -> usize {
        self.row
    }
}

impl Row for BatchRow<'_> {
    fn len(&self) -> usize {
        self.batch.num_columns()
    }

    fn datum(&self, idx: usize) -> Result<Datum> {
        if idx >= self.batch.num_columns() {
            return Err(out_of_range(idx, self.batch.num_columns()));
        }
        Datum::from_array(self.batch.column(idx), self.row)
    }
}
