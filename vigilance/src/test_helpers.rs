//! Table builders shared by unit tests.

use crate::core::Table;
use arrow::array::{ArrayRef, DictionaryArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::Int32Type;
use std::sync::Arc;

/// Builds a table of float columns with `rows` rows.
///
/// Column `j` holds `i * (j + 1) + (i * i + j) % 3` for row `i`, so columns are not
/// exact multiples of each other.
pub fn numeric_table(columns: &[&str], rows: usize) -> Table {
    let arrays: Vec<(String, ArrayRef)> = columns
        .iter()
        .enumerate()
        .map(|(j, name)| {
            let values: Vec<f64> = (0..rows)
                .map(|i| (i * (j + 1) + (i * i + j) % 3) as f64)
                .collect();
            (name.to_string(), Arc::new(Float64Array::from(values)) as ArrayRef)
        })
        .collect();
    Table::try_from_columns(arrays).expect("columns have equal length")
}

/// Builds a three-row table mixing string, integer and categorical columns.
///
/// | A | B | C | D        |
/// |---|---|---|----------|
/// | a | b | 1 | a (cat)  |
/// | b | a | 2 | b (cat)  |
/// | a | c | 3 | a (cat)  |
pub fn categorical_table() -> Table {
    let d: DictionaryArray<Int32Type> = vec!["a", "b", "a"].into_iter().collect();
    Table::try_from_columns(vec![
        ("A", Arc::new(StringArray::from(vec!["a", "b", "a"])) as ArrayRef),
        ("B", Arc::new(StringArray::from(vec!["b", "a", "c"])) as ArrayRef),
        ("C", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
        ("D", Arc::new(d) as ArrayRef),
    ])
    .expect("columns have equal length")
}
