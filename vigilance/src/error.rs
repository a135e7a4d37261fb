//! Error types for the vigilance library.
//!
//! Usage errors (a malformed schema, no schema at all, reporting before any
//! validation, an unsupported input) are programmer mistakes. They are
//! represented by [`VigilanceError`] and propagate to the caller through
//! [`Result`]. They are never accumulated in a validation report.
//!
//! Data-dependent outcomes are a different tier: predicates return a
//! [`ConditionViolation`](crate::constraints::ConditionViolation), which the
//! validator records and moves past.

use thiserror::Error;

use crate::expect::FailedExpectations;
use crate::statistics::StatsError;

/// The main error type for the vigilance library.
#[derive(Error, Debug)]
pub enum VigilanceError {
    /// The validator was handed something that is not a table.
    #[error("Unexpected type for argument table: {type_name}")]
    UnexpectedInput {
        /// Fully qualified name of the type that was received
        type_name: String,
    },

    /// Neither the stored schema nor the call supplied any condition.
    #[error("No schema defined to validate")]
    NoSchema,

    /// A report was requested before any table was validated.
    #[error("No table has yet been validated.")]
    NotValidated,

    /// A dtype condition names a token outside the recognized vocabulary.
    #[error("Unrecognised dtype specified: {0}")]
    UnknownDType(String),

    /// A condition of an unsupported shape was supplied.
    #[error(
        "Unexpected type for condition: {found}\nAcceptable types are: integer, sequence or predicate"
    )]
    SchemaCondition {
        /// Description of the shape that was received
        found: String,
    },

    /// A meta property name that the validator has no check routine for.
    #[error("Unknown schema property: {0}")]
    UnknownProperty(String),

    /// A named column does not exist in the table.
    #[error("Column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error raised by a statistical helper.
    #[error("Statistics error: {0}")]
    Statistics(#[from] StatsError),

    /// Delayed expectations reported in strict mode.
    #[error(transparent)]
    Expectations(#[from] FailedExpectations),
}

/// A type alias for `Result<T, VigilanceError>`.
pub type Result<T> = std::result::Result<T, VigilanceError>;

impl VigilanceError {
    /// Creates an unexpected input error for the type `T`.
    pub fn unexpected_input<T: ?Sized>() -> Self {
        Self::UnexpectedInput {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    /// Creates a schema condition error describing the received shape.
    pub fn schema_condition(found: impl Into<String>) -> Self {
        Self::SchemaCondition {
            found: found.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

impl From<serde_json::Error> for VigilanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_input_names_type() {
        let err = VigilanceError::unexpected_input::<&str>();
        assert_eq!(err.to_string(), "Unexpected type for argument table: &str");
    }

    #[test]
    fn test_schema_condition_message() {
        let err = VigilanceError::schema_condition("string");
        assert_eq!(
            err.to_string(),
            "Unexpected type for condition: string\nAcceptable types are: integer, sequence or predicate"
        );
    }

    #[test]
    fn test_usage_error_messages() {
        assert_eq!(
            VigilanceError::NoSchema.to_string(),
            "No schema defined to validate"
        );
        assert_eq!(
            VigilanceError::NotValidated.to_string(),
            "No table has yet been validated."
        );
        assert_eq!(
            VigilanceError::UnknownDType("foo".into()).to_string(),
            "Unrecognised dtype specified: foo"
        );
    }
}
