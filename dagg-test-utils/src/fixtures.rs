//! Row builders for aggregate tests.

use dagg_types::Datum;

/// One single-column row per value.
pub fn column_rows<T: Into<Datum> + Clone>(values: &[T]) -> Vec<Vec<Datum>> {
    values.iter().cloned().map(|v| vec![v.into()]).collect()
}

/// Integer column with `None` as `NULL`.
pub fn int_rows(values: &[Option<i64>]) -> Vec<Vec<Datum>> {
    column_rows(values)
}

/// Text column with `None` as `NULL`.
pub fn text_rows(values: &[Option<&str>]) -> Vec<Vec<Datum>> {
    values
        .iter()
        .map(|v| vec![v.map_or(Datum::Null, Datum::from)])
        .collect()
}

/// Zip equally long columns into rows.
pub fn zip_rows(columns: &[Vec<Datum>]) -> Vec<Vec<Datum>> {
    let len = columns.iter().map(Vec::len).min().unwrap_or(0);
    (0..len)
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_shape_rows() {
        assert_eq!(
            int_rows(&[Some(1), None]),
            vec![vec![Datum::Int64(1)], vec![Datum::Null]]
        );
        assert_eq!(text_rows(&[Some("a")]), vec![vec![Datum::from("a")]]);
        let rows = zip_rows(&[
            vec![Datum::Int64(1), Datum::Int64(2)],
            vec![Datum::from("x"), Datum::from("y")],
        ]);
        assert_eq!(rows[1], vec![Datum::Int64(2), Datum::from("y")]);
    }
}
