//! The closed set of condition shapes a schema property can declare.

use std::fmt;
use std::sync::Arc;

use super::{Contains, Excludes, FnPredicate, Max, Min, Predicate, Range, Value};
use crate::error::{Result, VigilanceError};

/// A declared constraint on one property of a table.
///
/// A condition is either a predicate, or an exact target value compared by
/// equality. Exact targets are limited to an integer (row or column counts)
/// or a sequence (names, labels, dtype tokens, column values).
#[derive(Clone)]
pub enum Condition {
    Predicate(Arc<dyn Predicate>),
    ExactScalar(i64),
    ExactSequence(Vec<Value>),
}

/// The outcome of evaluating a condition against a test value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(super::ConditionViolation),
    Mismatch { actual: String, expected: String },
}

impl Outcome {
    /// Returns the failure message, if the condition did not hold.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed(v) => Some(v.message().to_string()),
            Outcome::Mismatch { actual, expected } => Some(format!(
                "Actual value ({actual}) != target value ({expected})"
            )),
        }
    }
}

impl Condition {
    /// Wraps any predicate as a condition.
    pub fn predicate(p: impl Predicate + 'static) -> Self {
        Condition::Predicate(Arc::new(p))
    }

    /// Evaluates the condition against a resolved test value.
    pub fn evaluate(&self, test_value: &Value) -> Outcome {
        match self {
            Condition::Predicate(p) => match p.apply(test_value) {
                Ok(_) => Outcome::Passed,
                Err(violation) => Outcome::Failed(violation),
            },
            Condition::ExactScalar(expected) => {
                if *test_value == Value::Int(*expected) {
                    Outcome::Passed
                } else {
                    Outcome::Mismatch {
                        actual: test_value.to_string(),
                        expected: expected.to_string(),
                    }
                }
            }
            Condition::ExactSequence(expected) => match test_value {
                Value::List(actual) if actual == expected => Outcome::Passed,
                _ => Outcome::Mismatch {
                    actual: test_value.to_string(),
                    expected: Value::List(expected.clone()).to_string(),
                },
            },
        }
    }

    /// Returns a short description of the condition's shape.
    pub fn shape(&self) -> &str {
        match self {
            Condition::Predicate(p) => p.name(),
            Condition::ExactScalar(_) => "exact scalar",
            Condition::ExactSequence(_) => "exact sequence",
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Predicate(p) => f.debug_tuple("Predicate").field(p).finish(),
            Condition::ExactScalar(v) => f.debug_tuple("ExactScalar").field(v).finish(),
            Condition::ExactSequence(v) => f.debug_tuple("ExactSequence").field(v).finish(),
        }
    }
}

/// Converts a dynamic value into a condition.
///
/// Only integers and sequences are accepted as exact targets; any other
/// shape is a schema configuration error.
impl TryFrom<Value> for Condition {
    type Error = VigilanceError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Int(v) => Ok(Condition::ExactScalar(v)),
            Value::List(items) => Ok(Condition::ExactSequence(items)),
            other => Err(VigilanceError::schema_condition(other.type_name())),
        }
    }
}

macro_rules! impl_condition_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Condition {
                fn from(v: $t) -> Self {
                    Condition::ExactScalar(v as i64)
                }
            }
        )*
    };
}

impl_condition_from_int!(i32, i64, u32, usize);

impl<T: Into<Value>> From<Vec<T>> for Condition {
    fn from(items: Vec<T>) -> Self {
        Condition::ExactSequence(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_condition_from_predicate {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Condition {
                fn from(p: $t) -> Self {
                    Condition::predicate(p)
                }
            }
        )*
    };
}

impl_condition_from_predicate!(Range, Min, Max, Contains, Excludes, FnPredicate);
