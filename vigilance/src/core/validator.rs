//! The schema validator.

use arrow::record_batch::RecordBatch;
use std::any::Any;
use tracing::{info, instrument};

use super::dtype::is_recognized;
use super::result::{Bucket, ErrorEntry, ErrorLog};
use super::schema::{MetaProperty, Schema};
use super::Table;
use crate::constraints::{Condition, Outcome, Value};
use crate::error::{Result, VigilanceError};
use crate::formatters::{HumanFormatter, ResultFormatter};
use crate::logging::{truncate_field, LogConfig};
use crate::{log_condition, perf_debug};

/// Where a validator stands after its most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// No table has been validated yet
    Unvalidated,
    /// The last validation recorded no errors
    Passed,
    /// The last validation recorded at least one error
    Failed,
}

/// Applies a [`Schema`] to table snapshots and collects what failed.
///
/// Every declared property is checked on every call; a failing condition is
/// recorded in its bucket and the pass carries on. The buckets only ever
/// describe the most recent call.
///
/// Validation takes `&mut self`, so one instance serves one validation at a
/// time. Use one validator per thread for concurrent work.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::{ArrayRef, Int64Array};
/// use vigilance::constraints::Range;
/// use vigilance::core::{Bucket, MetaProperty, Schema, Table, Validator};
///
/// let table = Table::try_from_columns(vec![
///     ("x", Arc::new(Int64Array::from(vec![1, 2, 3])) as ArrayRef),
/// ])
/// .unwrap();
///
/// let mut validator = Validator::with_schema(
///     Schema::new().meta(MetaProperty::RowCount, Range::between(5, 11)),
/// );
///
/// assert!(!validator.validate(&table).unwrap());
/// let errors = validator.errors().unwrap();
/// assert_eq!(
///     errors.bucket(Bucket::Meta)[0].as_pair(),
///     ("row-count", "value must be at least 5")
/// );
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    schema: Schema,
    table: Option<Table>,
    errors: ErrorLog,
    log_config: LogConfig,
}

impl Validator {
    /// Creates a validator with an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that starts from `schema`.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn with_log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// The schema accumulated so far.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The table checked by the most recent call.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The errors recorded by the most recent call, if any call was made.
    pub fn errors(&self) -> Option<&ErrorLog> {
        self.table.as_ref().map(|_| &self.errors)
    }

    pub fn state(&self) -> ValidationState {
        match (&self.table, self.errors.is_empty()) {
            (None, _) => ValidationState::Unvalidated,
            (Some(_), true) => ValidationState::Passed,
            (Some(_), false) => ValidationState::Failed,
        }
    }

    /// The verdict of the most recent call.
    pub fn is_valid(&self) -> Option<bool> {
        match self.state() {
            ValidationState::Unvalidated => None,
            ValidationState::Passed => Some(true),
            ValidationState::Failed => Some(false),
        }
    }

    /// Validates a table against the stored schema.
    pub fn validate(&mut self, table: &Table) -> Result<bool> {
        self.validate_with(table, Schema::new())
    }

    /// Validates a value only known at runtime to be table-like.
    ///
    /// Accepts a [`Table`] or a bare [`RecordBatch`]; anything else is
    /// rejected with an error naming the received type.
    pub fn validate_any<T: Any>(&mut self, input: &T) -> Result<bool> {
        let input = input as &dyn Any;
        if let Some(table) = input.downcast_ref::<Table>() {
            return self.validate(table);
        }
        if let Some(batch) = input.downcast_ref::<RecordBatch>() {
            return self.validate(&Table::new(batch.clone()));
        }
        Err(VigilanceError::unexpected_input::<T>())
    }

    /// Merges `extra` into the stored schema, then validates the table.
    ///
    /// Returns `Ok(true)` when no errors were recorded. Usage errors such as
    /// an empty schema or an unrecognised dtype token are returned as `Err`.
    #[instrument(skip_all, fields(rows = table.n_rows(), columns = table.n_cols()))]
    pub fn validate_with(&mut self, table: &Table, extra: Schema) -> Result<bool> {
        self.table = None;
        self.errors = ErrorLog::new();

        self.schema.merge(extra);
        if self.schema.is_empty() {
            return Err(VigilanceError::NoSchema);
        }

        let mut errors = ErrorLog::new();

        for (property, condition) in self.schema.meta_conditions() {
            let test_value = meta_test_value(table, *property, condition)?;
            self.compare(
                &mut errors,
                Bucket::Meta,
                property.as_str(),
                &test_value,
                condition,
            );
        }

        for (column, condition) in self.schema.data_conditions() {
            match table.column_values(column) {
                Ok(values) => {
                    self.compare(
                        &mut errors,
                        Bucket::Data,
                        column,
                        &Value::List(values),
                        condition,
                    );
                }
                Err(VigilanceError::ColumnNotFound { .. }) => {
                    errors.push(
                        Bucket::Data,
                        ErrorEntry::new(column.as_str(), "column not found in table", None),
                    );
                }
                Err(e) => return Err(e),
            }
        }

        for constraint in self.schema.constraints() {
            if let Err(violation) = constraint.check(table) {
                log_condition!(
                    self.log_config,
                    constraint = constraint.name(),
                    "table constraint failed"
                );
                errors.push(
                    Bucket::Constraints,
                    ErrorEntry::new(constraint.name(), violation.message(), Some(violation.kind())),
                );
            }
        }

        // only a call that ran every check counts as validated
        self.table = Some(table.clone());
        self.errors = errors;
        let passed = self.errors.is_empty();
        info!(passed, errors = self.errors.len(), "validation finished");
        Ok(passed)
    }

    /// Shared comparison routine: evaluates one condition and records a
    /// failure in `bucket`.
    fn compare(
        &self,
        errors: &mut ErrorLog,
        bucket: Bucket,
        property: &str,
        test_value: &Value,
        condition: &Condition,
    ) {
        let outcome = condition.evaluate(test_value);
        log_condition!(
            self.log_config,
            property,
            condition = condition.shape(),
            passed = matches!(outcome, Outcome::Passed),
            "evaluated condition"
        );

        let kind = match &outcome {
            Outcome::Passed => return,
            Outcome::Failed(violation) => Some(violation.kind()),
            Outcome::Mismatch { .. } => None,
        };
        let message = outcome.message().unwrap_or_default();
        perf_debug!(
            self.log_config,
            bucket = bucket.as_str(),
            property,
            message = %truncate_field(&message, self.log_config.max_field_length),
            "condition failed"
        );
        errors.push(bucket, ErrorEntry::new(property, message, kind));
    }

    /// Renders the report of the most recent call without printing it.
    pub fn render_report(&self) -> Result<String> {
        if self.table.is_none() {
            return Err(VigilanceError::NotValidated);
        }
        HumanFormatter::new().format(&self.errors)
    }

    /// Prints the report of the most recent call to stdout and returns it.
    pub fn report(&self) -> Result<String> {
        let text = self.render_report()?;
        print!("{text}");
        Ok(text)
    }
}

/// Resolves the test value for a meta property.
///
/// For dtypes, the tokens an exact condition or a set predicate declares are
/// checked against the recognized vocabulary before anything is compared.
fn meta_test_value(table: &Table, property: MetaProperty, condition: &Condition) -> Result<Value> {
    let value = match property {
        MetaProperty::RowCount => Value::from(table.n_rows()),
        MetaProperty::ColumnCount => Value::from(table.n_cols()),
        MetaProperty::Columns => Value::from(table.column_names()),
        MetaProperty::Index => Value::List(table.index_values()?),
        MetaProperty::Dtypes => {
            match condition {
                Condition::ExactSequence(tokens) => check_dtype_tokens(tokens)?,
                Condition::Predicate(predicate) => {
                    if let Some(tokens) = predicate.declared_items() {
                        check_dtype_tokens(tokens)?;
                    }
                }
                Condition::ExactScalar(_) => {}
            }
            Value::from(table.dtypes())
        }
    };
    Ok(value)
}

fn check_dtype_tokens(tokens: &[Value]) -> Result<()> {
    for token in tokens {
        match token.as_str() {
            Some(t) if is_recognized(t) => {}
            _ => return Err(VigilanceError::UnknownDType(token.to_string())),
        }
    }
    Ok(())
}
