//! Table snapshots over Arrow record batches.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;

use super::dtype::dtype_token;
use crate::constraints::Value;
use crate::error::{Result, VigilanceError};

/// A table snapshot: an Arrow [`RecordBatch`] with an optional index column.
///
/// When an index column is designated it supplies the row labels and is
/// left out of the column names, column count and dtypes. Without one, rows
/// are labelled by position `0..n`.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Float64Array, StringArray};
/// use vigilance::core::Table;
/// use vigilance::constraints::Value;
///
/// let table = Table::try_from_columns(vec![
///     ("model", Arc::new(StringArray::from(vec!["Mazda RX4", "Datsun 710"])) as ArrayRef),
///     ("mpg", Arc::new(Float64Array::from(vec![21.0, 22.8])) as ArrayRef),
/// ])
/// .unwrap()
/// .with_index("model")
/// .unwrap();
///
/// assert_eq!(table.n_rows(), 2);
/// assert_eq!(table.column_names(), vec!["mpg".to_string()]);
/// assert_eq!(
///     table.index_values().unwrap(),
///     vec![Value::from("Mazda RX4"), Value::from("Datsun 710")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
    index: Option<usize>,
}

impl Table {
    /// Wraps a record batch with positional row labels.
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch, index: None }
    }

    /// Builds a table from named columns of equal length.
    pub fn try_from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, ArrayRef)>,
        S: AsRef<str>,
    {
        let batch = RecordBatch::try_from_iter(columns)?;
        Ok(Self::new(batch))
    }

    /// Designates the named column as the row index.
    pub fn with_index(mut self, column: &str) -> Result<Self> {
        let position = self
            .batch
            .schema()
            .index_of(column)
            .map_err(|_| VigilanceError::column_not_found(column))?;
        self.index = Some(position);
        Ok(self)
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Returns the name of the index column, if one was designated.
    pub fn index_name(&self) -> Option<&str> {
        self.index
            .map(|i| self.batch.schema_ref().field(i).name().as_str())
    }

    pub fn n_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of data columns, excluding the index column.
    pub fn n_cols(&self) -> usize {
        self.batch.num_columns() - usize::from(self.index.is_some())
    }

    fn data_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.batch.num_columns()).filter(move |i| Some(*i) != self.index)
    }

    /// Names of the data columns, in table order.
    pub fn column_names(&self) -> Vec<String> {
        let schema = self.batch.schema_ref();
        self.data_positions()
            .map(|i| schema.field(i).name().clone())
            .collect()
    }

    /// Dtype tokens of the data columns, in table order.
    pub fn dtypes(&self) -> Vec<String> {
        let schema = self.batch.schema_ref();
        self.data_positions()
            .map(|i| dtype_token(schema.field(i).data_type()))
            .collect()
    }

    /// Row labels: the index column's values, or positions `0..n`.
    pub fn index_values(&self) -> Result<Vec<Value>> {
        match self.index {
            Some(i) => array_values(self.batch.column(i)),
            None => Ok((0..self.n_rows()).map(Value::from).collect()),
        }
    }

    /// Returns a data column by name.
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        let position = self.batch.schema_ref().index_of(name).ok()?;
        if Some(position) == self.index {
            return None;
        }
        Some(self.batch.column(position))
    }

    /// Returns the values of a data column.
    pub fn column_values(&self, name: &str) -> Result<Vec<Value>> {
        let column = self
            .column(name)
            .ok_or_else(|| VigilanceError::column_not_found(name))?;
        array_values(column)
    }

    /// Iterates over the data columns as `(name, array)` pairs.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &ArrayRef)> + '_ {
        let schema = self.batch.schema_ref();
        self.data_positions()
            .map(move |i| (schema.field(i).name().as_str(), self.batch.column(i)))
    }
}

impl From<RecordBatch> for Table {
    fn from(batch: RecordBatch) -> Self {
        Self::new(batch)
    }
}

/// Converts every cell of an array into a [`Value`].
///
/// Integers and floats keep their numeric form, booleans stay booleans and
/// everything else (strings, dictionaries, timestamps) is rendered as text.
/// Unsigned 64-bit values above `i64::MAX` become floats.
pub fn array_values(array: &ArrayRef) -> Result<Vec<Value>> {
    let data_type = array.data_type();

    if let DataType::UInt64 = data_type {
        let ints = array.as_primitive::<UInt64Type>();
        return Ok(ints
            .iter()
            .map(|v| match v {
                Some(v) => i64::try_from(v).map_or(Value::Float(v as f64), Value::Int),
                None => Value::Null,
            })
            .collect());
    }

    if data_type.is_integer() {
        let ints = cast(array, &DataType::Int64)?;
        let ints = ints.as_primitive::<Int64Type>();
        return Ok(ints.iter().map(Value::from).collect());
    }

    if data_type.is_floating() {
        let floats = cast(array, &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        return Ok(floats.iter().map(Value::from).collect());
    }

    if let DataType::Boolean = data_type {
        return Ok(array.as_boolean().iter().map(Value::from).collect());
    }

    (0..array.len())
        .map(|row| {
            if array.is_null(row) {
                Ok(Value::Null)
            } else {
                Ok(Value::Str(array_value_to_string(array, row)?))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{categorical_table, numeric_table};
    use arrow::array::{DictionaryArray, Int32Array, StringArray, UInt64Array};
    use arrow::datatypes::Int32Type;
    use std::sync::Arc;

    #[test]
    fn test_shape() {
        let table = numeric_table(&["a", "b", "c"], 4);
        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column_names(), vec!["a", "b", "c"]);
        assert_eq!(table.dtypes(), vec!["float64"; 3]);
    }

    #[test]
    fn test_positional_index() {
        let table = numeric_table(&["a"], 3);
        assert_eq!(
            table.index_values().unwrap(),
            vec![Value::from(0), Value::from(1), Value::from(2)]
        );
        assert_eq!(table.index_name(), None);
    }

    #[test]
    fn test_index_column_is_excluded_from_columns() {
        let table = categorical_table().with_index("A").unwrap();
        assert_eq!(table.index_name(), Some("A"));
        assert_eq!(table.n_cols(), 3);
        assert_eq!(table.column_names(), vec!["B", "C", "D"]);
        assert!(table.column("A").is_none());
        assert_eq!(
            table.index_values().unwrap(),
            vec![Value::from("a"), Value::from("b"), Value::from("a")]
        );
    }

    #[test]
    fn test_with_index_missing_column() {
        let err = numeric_table(&["a"], 1).with_index("zzz").unwrap_err();
        assert!(matches!(err, VigilanceError::ColumnNotFound { ref column } if column == "zzz"));
    }

    #[test]
    fn test_array_values() {
        let ints: ArrayRef = Arc::new(Int32Array::from(vec![Some(1), None, Some(3)]));
        assert_eq!(
            array_values(&ints).unwrap(),
            vec![Value::Int(1), Value::Null, Value::Int(3)]
        );

        let strings: ArrayRef = Arc::new(StringArray::from(vec![Some("x"), None]));
        assert_eq!(
            array_values(&strings).unwrap(),
            vec![Value::from("x"), Value::Null]
        );

        let dict: DictionaryArray<Int32Type> = vec!["lo", "hi", "lo"].into_iter().collect();
        let dict: ArrayRef = Arc::new(dict);
        assert_eq!(
            array_values(&dict).unwrap(),
            vec![Value::from("lo"), Value::from("hi"), Value::from("lo")]
        );
    }

    #[test]
    fn test_array_values_unsigned_beyond_i64() {
        let big: ArrayRef = Arc::new(UInt64Array::from(vec![Some(u64::MAX), Some(5), None]));
        assert_eq!(
            array_values(&big).unwrap(),
            vec![Value::Float(u64::MAX as f64), Value::Int(5), Value::Null]
        );
    }

    #[test]
    fn test_column_values_not_found() {
        let table = numeric_table(&["a"], 2);
        assert!(table.column_values("b").is_err());
        assert_eq!(table.column_values("a").unwrap().len(), 2);
    }
}
