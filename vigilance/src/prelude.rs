//! Prelude for commonly used types and traits in vigilance.

pub use crate::config::SchemaConfig;
pub use crate::constraints::{
    predicate_fn, Condition, ConditionViolation, Contains, Excludes, Max, Min, Predicate, Range,
    Value, ViolationKind,
};
pub use crate::core::{Bucket, ErrorLog, MetaProperty, Schema, Table, TableConstraint, Validator};
pub use crate::error::{Result, VigilanceError};
pub use crate::expect::{report_failures, ExpectationLog, FailedExpectations, ReportOptions};
pub use crate::formatters::{FormatterConfig, HumanFormatter, JsonFormatter, ResultFormatter};
pub use crate::logging::LogConfig;
pub use crate::{expect, expect_in};
