//! Set membership predicates: [`Contains`] and [`Excludes`].
//!
//! Both sides of the comparison are treated as sets, so repeated values are
//! not counted. When repetition matters, declare the full sequence as an
//! exact condition instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::value::format_items;
use super::{ConditionViolation, Predicate, Value, ViolationKind};

/// Requires a sequence to include certain values.
///
/// With `only` set, the sequence must hold exactly those values and nothing
/// else.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{Contains, Predicate, Value};
///
/// let required = Contains::new(["A", "B", "C"]);
/// let err = required.check(&Value::from(vec!["A", "B"])).unwrap_err();
/// assert_eq!(err.message(), "sequence must contain the following: ['C']");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contains {
    pub items: Vec<Value>,
    #[serde(default)]
    pub only: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Contains {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            only: false,
            msg: None,
        }
    }

    /// Also fails when the sequence holds values beyond `items`.
    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    fn violation(&self, default: impl FnOnce() -> String) -> ConditionViolation {
        ConditionViolation::new(
            ViolationKind::Contains,
            self.msg.clone().unwrap_or_else(default),
        )
    }
}

impl Predicate for Contains {
    fn name(&self) -> &str {
        "contains"
    }

    fn declared_items(&self) -> Option<&[Value]> {
        Some(&self.items)
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        let expected: BTreeSet<&Value> = self.items.iter().collect();
        let actual: BTreeSet<&Value> = value.items().iter().collect();

        let missing: Vec<&Value> = expected.difference(&actual).copied().collect();

        if !self.only {
            if missing.is_empty() {
                return Ok(());
            }
            return Err(self.violation(|| {
                format!(
                    "sequence must contain the following: {}",
                    format_items(missing)
                )
            }));
        }

        let additional: Vec<&Value> = actual.difference(&expected).copied().collect();
        if missing.is_empty() && additional.is_empty() {
            return Ok(());
        }

        // the missing half always carries its four-space separator
        Err(self.violation(|| {
            let mut detail = String::new();
            if !missing.is_empty() {
                detail.push_str(&format!("Missing: {}    ", format_items(missing)));
            }
            if !additional.is_empty() {
                detail.push_str(&format!("Additional: {}", format_items(additional)));
            }
            format!(
                "sequence must only contain the following: {}\n{}",
                format_items(expected),
                detail
            )
        }))
    }
}

/// Requires a sequence to hold none of the given values.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{Excludes, Predicate, Value};
///
/// let forbidden = Excludes::new(["D", "E"]);
/// let err = forbidden.check(&Value::from(vec!["A", "E", "D"])).unwrap_err();
/// assert_eq!(err.message(), "sequence must not contain the following: ['D', 'E']");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Excludes {
    pub items: Vec<Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl Excludes {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            msg: None,
        }
    }

    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

impl Predicate for Excludes {
    fn name(&self) -> &str {
        "excludes"
    }

    fn declared_items(&self) -> Option<&[Value]> {
        Some(&self.items)
    }

    fn check(&self, value: &Value) -> Result<(), ConditionViolation> {
        let forbidden: BTreeSet<&Value> = self.items.iter().collect();
        let actual: BTreeSet<&Value> = value.items().iter().collect();

        let found: Vec<&Value> = forbidden.intersection(&actual).copied().collect();
        if found.is_empty() {
            return Ok(());
        }

        Err(ConditionViolation::new(
            ViolationKind::Excludes,
            self.msg.clone().unwrap_or_else(|| {
                format!(
                    "sequence must not contain the following: {}",
                    format_items(found)
                )
            }),
        ))
    }
}
