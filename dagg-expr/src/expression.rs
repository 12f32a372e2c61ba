use std::fmt;
use std::sync::Arc;

use dagg_result::Result;
use dagg_types::{Datum, FieldType};

use crate::coerce::coerce_datum;
use crate::row::Row;

/// An evaluable argument expression.
pub trait Expression: fmt::Debug + Send + Sync {
    /// Evaluate against `row`. `NULL` is a value, not an error.
    fn eval(&self, row: &dyn Row) -> Result<Datum>;
}

pub type ExprRef = Arc<dyn Expression>;

/// Reads one input column and coerces it to the declared field type.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnRef {
    pub index: usize,
    pub field_type: FieldType,
}

impl ColumnRef {
    pub fn new(index: usize, field_type: FieldType) -> Self {
        Self { index, field_type }
    }
}

impl Expression for ColumnRef {
    fn eval(&self, row: &dyn Row) -> Result<Datum> {
        let raw = row.datum(self.index)?;
        coerce_datum(self.field_type, raw)
    }
}

/// A literal argument, such as the `*` of `COUNT(*)` lowered to `1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constant(pub Datum);

impl Expression for Constant {
    fn eval(&self, _row: &dyn Row) -> Result<Datum> {
        Ok(self.0.clone())
    }
}

/// Evaluate every argument of an aggregate against `row`, in order.
pub fn eval_args(args: &[ExprRef], row: &dyn Row) -> Result<Vec<Datum>> {
    args.iter().map(|arg| arg.eval(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagg_result::Error;

    #[test]
    fn column_ref_coerces_declared_type() {
        let row = vec![Datum::from("42"), Datum::Int64(7)];
        let col = ColumnRef::new(0, FieldType::Int64);
        assert_eq!(col.eval(&row).unwrap(), Datum::Int64(42));

        let missing = ColumnRef::new(5, FieldType::Int64);
        assert!(matches!(missing.eval(&row), Err(Error::Evaluation(_))));
    }

    #[test]
    fn eval_args_preserves_order() {
        let args: Vec<ExprRef> = vec![
            Arc::new(ColumnRef::new(1, FieldType::Int64)),
            Arc::new(Constant(Datum::from("x"))),
        ];
        let row = vec![Datum::Null, Datum::Int64(9)];
        assert_eq!(
            eval_args(&args, &row).unwrap(),
            vec![Datum::Int64(9), Datum::from("x")]
        );
    }
}
