//! Statistical helpers for dispersion and outlier conditions.
//!
//! The functions here are pure numeric reductions. They can be called
//! directly inside `expect!` expressions, or wrapped as conditions through
//! [`within_sds`], [`within_mads`] and [`outlier_constraint`].
//!
//! ## Example
//!
//! ```rust
//! use vigilance::statistics::{within_n_absolute_deviations, within_n_standard_deviations};
//!
//! let mpg = [21.0, 22.8, 21.4, 18.7, 18.1];
//! assert!(within_n_standard_deviations(2.0, &mpg));
//! assert!(!within_n_absolute_deviations(0.5, &mpg));
//! ```

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use thiserror::Error;

use crate::constraints::{predicate_fn, ConditionViolation, FnPredicate, Value};
use crate::core::{Table, TableConstraint};

/// Errors raised by the statistical helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The covariance matrix has no inverse.
    #[error("covariance matrix is singular")]
    SingularMatrix,

    /// Too few observations for the computation.
    #[error("at least {required} rows are required, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A column holds nulls.
    #[error("column '{column}' contains null values")]
    NullValues { column: String },

    /// A column is not numeric.
    #[error("column '{column}' is not numeric: {data_type}")]
    NonNumeric { column: String, data_type: String },

    /// Column lengths or matrix dimensions disagree.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Relative pivot size below which a matrix is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Arithmetic mean; `NaN` for empty input.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`).
pub fn population_std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean absolute deviation around the mean.
pub fn mean_absolute_deviation(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m).abs()).sum::<f64>() / values.len() as f64
}

/// True when every `|x - mean| / scale <= n`.
///
/// A zero scale means every value equals the mean.
fn within_scaled(n: f64, values: &[f64], scale: f64) -> bool {
    if values.is_empty() || scale == 0.0 {
        return true;
    }
    let m = mean(values);
    values.iter().all(|v| ((v - m) / scale).abs() <= n)
}

/// True when every value lies within `n` population standard deviations of
/// the mean. Empty input is within bounds.
pub fn within_n_standard_deviations(n: f64, values: &[f64]) -> bool {
    if values.is_empty() {
        return true;
    }
    within_scaled(n, values, population_std_dev(values))
}

/// True when every value lies within `n` mean absolute deviations of the
/// mean. Empty input is within bounds.
pub fn within_n_absolute_deviations(n: f64, values: &[f64]) -> bool {
    if values.is_empty() {
        return true;
    }
    within_scaled(n, values, mean_absolute_deviation(values))
}

/// Sample covariance matrix (divides by `n - 1`) of equally long columns.
pub fn covariance_matrix(columns: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, StatsError> {
    let rows = columns.first().map_or(0, Vec::len);
    if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
        return Err(StatsError::DimensionMismatch {
            expected: rows,
            actual: bad.len(),
        });
    }
    if rows < 2 {
        return Err(StatsError::InsufficientData {
            required: 2,
            actual: rows,
        });
    }

    let means: Vec<f64> = columns.iter().map(|c| mean(c)).collect();
    let p = columns.len();
    let mut cov = vec![vec![0.0; p]; p];
    for i in 0..p {
        for j in i..p {
            let sum: f64 = columns[i]
                .iter()
                .zip(&columns[j])
                .map(|(a, b)| (a - means[i]) * (b - means[j]))
                .sum();
            let value = sum / (rows - 1) as f64;
            cov[i][j] = value;
            cov[j][i] = value;
        }
    }
    Ok(cov)
}

/// Inverts a square matrix by Gauss-Jordan elimination with partial
/// pivoting.
pub fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, StatsError> {
    let n = matrix.len();
    if let Some(row) = matrix.iter().find(|r| r.len() != n) {
        return Err(StatsError::DimensionMismatch {
            expected: n,
            actual: row.len(),
        });
    }

    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if n > 0 && scale == 0.0 {
        return Err(StatsError::SingularMatrix);
    }

    // Augmented [A | I]
    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { 1.0 } else { 0.0 }));
            r
        })
        .collect();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&a, &b| aug[a][col].abs().total_cmp(&aug[b][col].abs()))
            .unwrap_or(col);
        if aug[pivot_row][col].abs() <= SINGULAR_TOLERANCE * scale {
            return Err(StatsError::SingularMatrix);
        }
        aug.swap(col, pivot_row);

        let pivot = aug[col][col];
        for v in aug[col].iter_mut() {
            *v /= pivot;
        }
        let pivot_values = aug[col].clone();
        for (r, row) in aug.iter_mut().enumerate() {
            if r == col {
                continue;
            }
            let factor = row[col];
            if factor != 0.0 {
                for (v, p) in row.iter_mut().zip(&pivot_values) {
                    *v -= factor * p;
                }
            }
        }
    }

    Ok(aug.into_iter().map(|row| row[n..].to_vec()).collect())
}

/// Squared Mahalanobis distance of each row from the column means.
///
/// `columns` holds one vector per variable, all of the same length.
pub fn mahalanobis_squared(columns: &[Vec<f64>]) -> Result<Vec<f64>, StatsError> {
    let rows = columns.first().map_or(0, Vec::len);
    if columns.is_empty() {
        return Ok(Vec::new());
    }
    let inverse = invert(&covariance_matrix(columns)?)?;
    let means: Vec<f64> = columns.iter().map(|c| mean(c)).collect();

    let distances: Vec<f64> = (0..rows)
        .map(|r| {
            let centered: Vec<f64> = columns
                .iter()
                .zip(&means)
                .map(|(c, m)| c[r] - m)
                .collect();
            inverse
                .iter()
                .zip(&centered)
                .map(|(row, ci)| ci * row.iter().zip(&centered).map(|(s, cj)| s * cj).sum::<f64>())
                .sum::<f64>()
        })
        .collect();
    Ok(distances)
}

/// Values of a numeric table column as `f64`.
pub fn column_f64(table: &Table, name: &str) -> Result<Vec<f64>, crate::error::VigilanceError> {
    let array = table
        .column(name)
        .ok_or_else(|| crate::error::VigilanceError::column_not_found(name))?;
    Ok(array_f64(name, array)?)
}

fn array_f64(name: &str, array: &ArrayRef) -> Result<Vec<f64>, StatsError> {
    let data_type = array.data_type();
    if !data_type.is_numeric() {
        return Err(StatsError::NonNumeric {
            column: name.to_string(),
            data_type: data_type.to_string(),
        });
    }
    if array.null_count() > 0 {
        return Err(StatsError::NullValues {
            column: name.to_string(),
        });
    }
    let floats = cast(array, &DataType::Float64).map_err(|_| StatsError::NonNumeric {
        column: name.to_string(),
        data_type: data_type.to_string(),
    })?;
    Ok(floats.as_primitive::<Float64Type>().values().to_vec())
}

/// Squared Mahalanobis distance of every row of the table from the column
/// means, over all data columns.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Float64Array};
/// use vigilance::core::Table;
/// use vigilance::statistics::outlier_distance;
///
/// let table = Table::try_from_columns(vec![
///     ("x", Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])) as ArrayRef),
///     ("y", Arc::new(Float64Array::from(vec![2.0, 1.0, 4.0, 3.0])) as ArrayRef),
/// ])
/// .unwrap();
///
/// let distances = outlier_distance(&table).unwrap();
/// assert_eq!(distances.len(), 4);
/// // The squared distances of n rows always sum to p * (n - 1).
/// assert!((distances.iter().sum::<f64>() - 6.0).abs() < 1e-9);
/// ```
pub fn outlier_distance(table: &Table) -> Result<Vec<f64>, StatsError> {
    let columns = table
        .columns()
        .map(|(name, array)| array_f64(name, array))
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        return Ok(vec![0.0; table.n_rows()]);
    }
    mahalanobis_squared(&columns)
}

fn numeric_items(value: &Value) -> Result<Vec<f64>, ConditionViolation> {
    value
        .items()
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                ConditionViolation::custom(format!("value must be numeric, got {}", v.type_name()))
            })
        })
        .collect()
}

/// A condition holding when every value is within `n` standard deviations.
pub fn within_sds(n: f64) -> FnPredicate {
    predicate_fn("within_n_sds", move |value: &Value| {
        if within_n_standard_deviations(n, &numeric_items(value)?) {
            Ok(())
        } else {
            Err(ConditionViolation::custom(format!(
                "values must be within {n} standard deviations"
            )))
        }
    })
}

/// A condition holding when every value is within `n` mean absolute
/// deviations.
pub fn within_mads(n: f64) -> FnPredicate {
    predicate_fn("within_n_mads", move |value: &Value| {
        if within_n_absolute_deviations(n, &numeric_items(value)?) {
            Ok(())
        } else {
            Err(ConditionViolation::custom(format!(
                "values must be within {n} absolute deviations"
            )))
        }
    })
}

/// A table constraint holding when every row's outlier distance is within
/// `n` mean absolute deviations of the average distance.
///
/// A table whose distance cannot be computed fails with the reason.
pub fn outlier_constraint(name: impl Into<String>, n: f64) -> TableConstraint {
    TableConstraint::new(name, move |table: &Table| {
        let distances =
            outlier_distance(table).map_err(|e| ConditionViolation::custom(e.to_string()))?;
        if within_n_absolute_deviations(n, &distances) {
            Ok(())
        } else {
            Err(ConditionViolation::custom(format!(
                "outlier distances must be within {n} absolute deviations"
            )))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{categorical_table, numeric_table};
    use arrow::array::Float64Array;
    use std::sync::Arc;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_dispersion_measures() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(mean(&values), 5.0));
        assert!(approx(population_std_dev(&values), 2.0));
        assert!(approx(mean_absolute_deviation(&values), 1.5));
    }

    #[test]
    fn test_within_bounds() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // 9.0 sits exactly 2 standard deviations out
        assert!(within_n_standard_deviations(2.0, &values));
        assert!(!within_n_standard_deviations(1.9, &values));
        // and 4/1.5 absolute deviations out
        assert!(within_n_absolute_deviations(2.7, &values));
        assert!(!within_n_absolute_deviations(2.6, &values));
    }

    #[test]
    fn test_degenerate_inputs_are_within_bounds() {
        assert!(within_n_standard_deviations(0.0, &[]));
        assert!(within_n_absolute_deviations(0.0, &[]));
        assert!(within_n_standard_deviations(0.0, &[3.0, 3.0, 3.0]));
        assert!(within_n_absolute_deviations(0.0, &[3.0]));
    }

    #[test]
    fn test_invert_identity_and_known_matrix() {
        let inv = invert(&[vec![4.0, 7.0], vec![2.0, 6.0]]).unwrap();
        assert!(approx(inv[0][0], 0.6));
        assert!(approx(inv[0][1], -0.7));
        assert!(approx(inv[1][0], -0.2));
        assert!(approx(inv[1][1], 0.4));

        assert_eq!(
            invert(&[vec![1.0, 2.0], vec![2.0, 4.0]]),
            Err(StatsError::SingularMatrix)
        );
    }

    #[test]
    fn test_covariance_matrix() {
        let cov = covariance_matrix(&[vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 7.0]]).unwrap();
        assert!(approx(cov[0][0], 1.0));
        assert!(approx(cov[0][1], 2.5));
        assert!(approx(cov[1][0], 2.5));
        assert!(approx(cov[1][1], 6.333333333333333));

        assert_eq!(
            covariance_matrix(&[vec![1.0]]),
            Err(StatsError::InsufficientData {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_outlier_distance_sum_identity() {
        let table = numeric_table(&["a", "b"], 12);
        let distances = outlier_distance(&table).unwrap();
        assert_eq!(distances.len(), 12);
        assert!(distances.iter().all(|d| *d >= -1e-9));
        assert!((distances.iter().sum::<f64>() - 2.0 * 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_outlier_distance_singular() {
        let table = Table::try_from_columns(vec![
            ("x", Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])) as ArrayRef),
            ("y", Arc::new(Float64Array::from(vec![2.0, 4.0, 6.0])) as ArrayRef),
        ])
        .unwrap();
        assert_eq!(outlier_distance(&table), Err(StatsError::SingularMatrix));
    }

    #[test]
    fn test_outlier_distance_rejects_bad_columns() {
        assert!(matches!(
            outlier_distance(&categorical_table()),
            Err(StatsError::NonNumeric { ref column, .. }) if column == "A"
        ));

        let table = Table::try_from_columns(vec![(
            "x",
            Arc::new(Float64Array::from(vec![Some(1.0), None])) as ArrayRef,
        )])
        .unwrap();
        assert_eq!(
            outlier_distance(&table),
            Err(StatsError::NullValues {
                column: "x".to_string()
            })
        );
    }

    #[test]
    fn test_column_f64() {
        let table = categorical_table();
        assert_eq!(column_f64(&table, "C").unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(column_f64(&table, "nope").is_err());
    }

    #[test]
    fn test_condition_wrappers() {
        use crate::constraints::Predicate;

        let values = Value::from(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(within_sds(2.0).check(&values).is_ok());
        assert_eq!(
            within_sds(1.0).check(&values).unwrap_err().message(),
            "values must be within 1 standard deviations"
        );
        assert!(within_mads(1.0).check(&values).is_err());
        assert_eq!(
            within_mads(1.0).check(&Value::from(vec!["a"])).unwrap_err().message(),
            "value must be numeric, got string"
        );

        let constraint = outlier_constraint("outliers", 10.0);
        assert!(constraint.check(&numeric_table(&["a", "b"], 12)).is_ok());
        assert!(constraint.check(&categorical_table()).is_err());
    }
}
