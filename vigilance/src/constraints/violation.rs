//! Condition-violation signals raised by predicates.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The category of a condition violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The value is not in the given range
    Range,
    /// The value is below the specified minimum
    Min,
    /// The value is above the specified maximum
    Max,
    /// The sequence is missing required items
    Contains,
    /// The sequence holds forbidden items
    Excludes,
    /// Raised by a caller-supplied predicate or table constraint
    Custom,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Range => "range",
            ViolationKind::Min => "min",
            ViolationKind::Max => "max",
            ViolationKind::Contains => "contains",
            ViolationKind::Excludes => "excludes",
            ViolationKind::Custom => "custom",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed failure returned by a predicate when a value violates it.
///
/// Violations are expected, data-dependent outcomes. The validator catches
/// them and records the message; they never abort a validation pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConditionViolation {
    kind: ViolationKind,
    message: String,
}

impl ConditionViolation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a violation for a caller-supplied check.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Custom, message)
    }

    pub fn kind(&self) -> ViolationKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
