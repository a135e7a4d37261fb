//! Numeric bound predicates: [`Range`], [`Min`] and [`Max`].
//!
//! All three apply to numeric scalars. Applied to a sequence (a column's
//! values, say) they check every element and report the first offender.
//! Null elements are skipped.

use serde::{Deserialize, Serialize};

use super::{ConditionViolation, Predicate, Value, ViolationKind};

fn included() -> bool {
    true
}

/// A number usable as a bound of [`Range`], [`Min`] or [`Max`].
///
/// Implemented for every primitive integer and float, so row counts held in
/// `usize` and `i64` cells can be used directly. Bounds are compared as
/// `f64`.
pub trait BoundValue {
    fn into_bound(self) -> f64;
}

macro_rules! impl_bound_value {
    ($($t:ty),*) => {
        $(
            impl BoundValue for $t {
                fn into_bound(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_bound_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

fn check_lower(
    kind: ViolationKind,
    v: f64,
    min: Option<f64>,
    min_included: bool,
    msg: Option<&String>,
) -> Result<(), ConditionViolation> {
    let Some(min) = min else {
        return Ok(());
    };
    if min_included && v < min {
        return Err(ConditionViolation::new(
            kind,
            msg.cloned()
                .unwrap_or_else(|| format!("value must be at least {min}")),
        ));
    }
    if !min_included && v <= min {
        return Err(ConditionViolation::new(
            kind,
            msg.cloned()
                .unwrap_or_else(|| format!("value must be higher than {min}")),
        ));
    }
    Ok(())
}

fn check_upper(
    kind: ViolationKind,
    v: f64,
    max: Option<f64>,
    max_included: bool,
    msg: Option<&String>,
) -> Result<(), ConditionViolation> {
    let Some(max) = max else {
        return Ok(());
    };
    if max_included && v > max {
        return Err(ConditionViolation::new(
            kind,
            msg.cloned()
                .unwrap_or_else(|| format!("value must be at most {max}")),
        ));
    }
    if !max_included && v >= max {
        return Err(ConditionViolation::new(
            kind,
            msg.cloned()
                .unwrap_or_else(|| format!("value must be lower than {max}")),
        ));
    }
    Ok(())
}

/// Applies a numeric check to a scalar, or to every element of a sequence.
fn check_numeric<F>(
    kind: ViolationKind,
    value: &Value,
    msg: Option<&String>,
    check: &F,
) -> Result<(), ConditionViolation>
where
    F: Fn(f64) -> Result<(), ConditionViolation>,
{
    match value {
        Value::Null => Ok(()),
        Value::List(items) => items
            .iter()
            .try_for_each(|item| check_numeric(kind, item, msg, check)),
        other => match other.as_f64() {
            Some(v) => check(v),
            None => Err(ConditionViolation::new(
                kind,
                msg.cloned().unwrap_or_else(|| {
                    format!("value must be numeric, got {}", other.type_name())
                }),
            )),
        },
    }
}

/// Limits a numeric value to a range.
///
/// Either bound may be absent, leaving that side unbounded. Both bounds are
/// inclusive unless excluded explicitly.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{Predicate, Range, Value};
///
/// let rows = Range::between(5, 11);
/// let err = rows.check(&Value::from(3)).unwrap_err();
/// assert_eq!(err.message(), "value must be at least 5");
///
/// let open = Range::between(4, 10).min_excluded();
/// assert_eq!(
///     open.check(&Value::from(4)).unwrap_err().message(),
///     "value must be higher than 4"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "included")]
    pub min_included: bool,
    #[serde(default = "included")]
    pub max_included: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Default for Range {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            min_included: true,
            max_included: true,
            msg: None,
        }
    }
}

impl Range {
    /// Creates an unbounded range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inclusive range between `min` and `max`.
    pub fn between(min: impl BoundValue, max: impl BoundValue) -> Self {
        Self::new().min(min).max(max)
    }

    pub fn min(mut self, min: impl BoundValue) -> Self {
        self.min = Some(min.into_bound());
        self
    }

    pub fn max(mut self, max: impl BoundValue) -> Self {
        self.max = Some(max.into_bound());
        self
    }

    /// Makes the lower bound itself an invalid value.
    pub fn min_excluded(mut self) -> Self {
        self.min_included = false;
        self
    }

    /// Makes the upper bound itself an invalid value.
    pub fn max_excluded(mut self) -> Self {
        self.max_included = false;
        self
    }

    /// Replaces the default failure message.
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Predicate for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        let kind = ViolationKind::Range;
        let msg = self.msg.as_ref();
        check_numeric(kind, value, msg, &|v| {
            check_lower(kind, v, self.min, self.min_included, msg)?;
            check_upper(kind, v, self.max, self.max_included, msg)
        })
    }
}

/// Limits a numeric value to be above a minimum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Min {
    pub min: f64,
    #[serde(default = "included")]
    pub min_included: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Min {
    pub fn new(min: impl BoundValue) -> Self {
        Self {
            min: min.into_bound(),
            min_included: true,
            msg: None,
        }
    }

    pub fn excluded(mut self) -> Self {
        self.min_included = false;
        self
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Predicate for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        let kind = ViolationKind::Min;
        let msg = self.msg.as_ref();
        check_numeric(kind, value, msg, &|v| {
            check_lower(kind, v, Some(self.min), self.min_included, msg)
        })
    }
}

/// Limits a numeric value to be below a maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Max {
    pub max: f64,
    #[serde(default = "included")]
    pub max_included: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Max {
    pub fn new(max: impl BoundValue) -> Self {
        Self {
            max: max.into_bound(),
            max_included: true,
            msg: None,
        }
    }

    pub fn excluded(mut self) -> Self {
        self.max_included = false;
        self
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Predicate for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        let kind = ViolationKind::Max;
        let msg = self.msg.as_ref();
        check_numeric(kind, value, msg, &|v| {
            check_upper(kind, v, Some(self.max), self.max_included, msg)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(p: &dyn Predicate, v: impl Into<Value>) -> Option<String> {
        p.check(&v.into()).err().map(|e| e.message().to_string())
    }

    #[test]
    fn test_range_inclusive() {
        let f = Range::between(4, 10);
        assert_eq!(message(&f, 3).as_deref(), Some("value must be at least 4"));
        assert_eq!(message(&f, 11).as_deref(), Some("value must be at most 10"));
        assert_eq!(message(&f, 4), None);
        assert_eq!(message(&f, 10), None);
    }

    #[test]
    fn test_range_exclusive() {
        let f = Range::between(4, 10).min_excluded();
        assert_eq!(message(&f, 4).as_deref(), Some("value must be higher than 4"));
        let f = Range::between(4, 10).max_excluded();
        assert_eq!(message(&f, 10).as_deref(), Some("value must be lower than 10"));
    }

    #[test]
    fn test_range_one_sided() {
        let f = Range::new().max(2.5);
        assert_eq!(message(&f, -1000), None);
        assert_eq!(message(&f, 3).as_deref(), Some("value must be at most 2.5"));
    }

    #[test]
    fn test_range_custom_message() {
        let f = Range::between(0, 1).message("out of unit interval");
        assert_eq!(message(&f, 2).as_deref(), Some("out of unit interval"));
    }

    #[test]
    fn test_range_kind() {
        let err = Range::between(0, 1).check(&Value::from(5)).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::Range);
    }

    #[test]
    fn test_range_over_sequence_reports_first_offender() {
        let f = Range::between(0, 10);
        let column = Value::from(vec![1.0, 12.0, -3.0]);
        assert_eq!(
            message(&f, column).as_deref(),
            Some("value must be at most 10")
        );
        assert_eq!(message(&f, vec![Some(1), None, Some(2)]), None);
    }

    #[test]
    fn test_range_rejects_non_numeric() {
        let f = Range::between(0, 10);
        assert_eq!(
            message(&f, "abc").as_deref(),
            Some("value must be numeric, got string")
        );
    }

    #[test]
    fn test_max() {
        let f = Max::new(10);
        let err = f.check(&Value::from(11)).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::Max);
        assert_eq!(err.message(), "value must be at most 10");
        let f = Max::new(10).excluded();
        assert_eq!(message(&f, 10).as_deref(), Some("value must be lower than 10"));
    }

    #[test]
    fn test_min() {
        let f = Min::new(4);
        let err = f.check(&Value::from(3)).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::Min);
        assert_eq!(err.message(), "value must be at least 4");
        let f = Min::new(4).excluded();
        assert_eq!(message(&f, 4).as_deref(), Some("value must be higher than 4"));
    }

    #[test]
    fn test_bounds_from_wide_integers() {
        let rows: usize = 8;
        let cap: i64 = 10;
        let f = Range::between(rows, cap);
        assert_eq!(message(&f, 9), None);
        assert_eq!(message(&f, 11).as_deref(), Some("value must be at most 10"));
        assert_eq!(Min::new(rows), Min::new(8.0));
        assert_eq!(Max::new(u64::from(7u8)).max, 7.0);
    }

    #[test]
    fn test_range_deserializes_with_defaults() {
        let f: Range = serde_json::from_str(r#"{"min": 5, "max": 11}"#).unwrap();
        assert_eq!(f, Range::between(5, 11));
    }
}
