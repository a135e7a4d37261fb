//! The predicate trait and closure-backed predicates.

use std::fmt;
use std::sync::Arc;

use super::{ConditionViolation, Value};

/// A single-argument check on a resolved test value.
///
/// Implementations must be pure: the same input always yields the same
/// outcome, and checking holds no mutable state.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{Predicate, Range, Value};
///
/// let in_range = Range::between(4, 10);
/// let value = Value::from(7);
/// assert_eq!(in_range.apply(&value).unwrap(), &value);
/// assert!(in_range.apply(&Value::from(11)).is_err());
/// ```
pub trait Predicate: fmt::Debug + Send + Sync {
    /// Returns the name of the predicate, used in logs.
    fn name(&self) -> &str;

    /// Checks the value, returning a violation if it fails.
    fn check(&self, value: &Value) -> Result<(), ConditionViolation>;

    /// The values this predicate compares against, for predicates built
    /// from a declared item list.
    fn declared_items(&self) -> Option<&[Value]> {
        None
    }

    /// Checks the value and hands it back unchanged on success.
    fn apply<'a>(&self, value: &'a Value) -> Result<&'a Value, ConditionViolation> {
        self.check(value).map(|()| value)
    }
}

type CheckFn = dyn Fn(&Value) -> Result<(), ConditionViolation> + Send + Sync;

/// A predicate backed by a caller-supplied closure.
#[derive(Clone)]
pub struct FnPredicate {
    name: String,
    check: Arc<CheckFn>,
}

impl fmt::Debug for FnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Predicate for FnPredicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        (self.check)(value)
    }
}

/// Wraps a closure as a named predicate.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{predicate_fn, ConditionViolation, Predicate, Value};
///
/// let even = predicate_fn("even", |v: &Value| match v {
///     Value::Int(n) if n % 2 == 0 => Ok(()),
///     other => Err(ConditionViolation::custom(format!("{other} is not even"))),
/// });
/// assert!(even.check(&Value::from(4)).is_ok());
/// assert_eq!(even.check(&Value::from(3)).unwrap_err().message(), "3 is not even");
/// ```
pub fn predicate_fn<F>(name: impl Into<String>, check: F) -> FnPredicate
where
    F: Fn(&Value) -> Result<(), ConditionViolation> + Send + Sync + 'static,
{
    FnPredicate {
        name: name.into(),
        check: Arc::new(check),
    }
}
