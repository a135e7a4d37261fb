//! Schemas: named conditions grouped into meta, data and table namespaces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::Table;
use crate::constraints::{Condition, ConditionViolation};
use crate::error::VigilanceError;

/// A structural property of a table that a meta condition can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetaProperty {
    /// Number of rows
    RowCount,
    /// Number of data columns
    ColumnCount,
    /// Data column names, in order
    Columns,
    /// Row labels, in order
    Index,
    /// Data column dtype tokens, in order
    Dtypes,
}

impl MetaProperty {
    pub const ALL: [MetaProperty; 5] = [
        MetaProperty::RowCount,
        MetaProperty::ColumnCount,
        MetaProperty::Columns,
        MetaProperty::Index,
        MetaProperty::Dtypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetaProperty::RowCount => "row-count",
            MetaProperty::ColumnCount => "column-count",
            MetaProperty::Columns => "columns",
            MetaProperty::Index => "index",
            MetaProperty::Dtypes => "dtypes",
        }
    }
}

impl fmt::Display for MetaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetaProperty {
    type Err = VigilanceError;

    /// Parses a property name; the short forms `nrows` and `ncols` are
    /// accepted too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row-count" | "nrows" => Ok(MetaProperty::RowCount),
            "column-count" | "ncols" => Ok(MetaProperty::ColumnCount),
            "columns" => Ok(MetaProperty::Columns),
            "index" => Ok(MetaProperty::Index),
            "dtypes" => Ok(MetaProperty::Dtypes),
            other => Err(VigilanceError::UnknownProperty(other.to_string())),
        }
    }
}

type TableCheck = dyn Fn(&Table) -> Result<(), ConditionViolation> + Send + Sync;

/// A named check over the whole table.
///
/// Table constraints cover conditions that span several columns, such as
/// bounded outlier distance. A violation is recorded in the `constraints`
/// bucket under the constraint's name.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::ConditionViolation;
/// use vigilance::core::TableConstraint;
///
/// let not_empty = TableConstraint::new("not-empty", |table| {
///     if table.n_rows() > 0 {
///         Ok(())
///     } else {
///         Err(ConditionViolation::custom("table has no rows"))
///     }
/// });
/// assert_eq!(not_empty.name(), "not-empty");
/// ```
#[derive(Clone)]
pub struct TableConstraint {
    name: String,
    check: Arc<TableCheck>,
}

impl TableConstraint {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Table) -> Result<(), ConditionViolation> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, table: &Table) -> Result<(), ConditionViolation> {
        (self.check)(table)
    }
}

impl fmt::Debug for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableConstraint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Inserts or replaces an entry, keeping the first declaration's position.
fn upsert<K: PartialEq, V>(entries: &mut Vec<(K, V)>, key: K, value: V) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

/// The full set of named conditions to check against a table.
///
/// Properties are checked in declaration order. Declaring a property again
/// replaces its condition in place.
///
/// # Examples
///
/// ```rust
/// use vigilance::constraints::{Contains, Range};
/// use vigilance::core::{MetaProperty, Schema};
///
/// let schema = Schema::new()
///     .meta(MetaProperty::RowCount, Range::between(5, 11))
///     .meta(MetaProperty::Columns, Contains::new(["mpg", "cyl"]))
///     .data("vs", Contains::new([0, 1]).only());
///
/// assert_eq!(schema.meta_conditions().len(), 2);
/// assert_eq!(schema.data_conditions().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    meta: Vec<(MetaProperty, Condition)>,
    data: Vec<(String, Condition)>,
    constraints: Vec<TableConstraint>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a condition on a structural property.
    pub fn meta(mut self, property: MetaProperty, condition: impl Into<Condition>) -> Self {
        self.set_meta(property, condition);
        self
    }

    /// Declares a condition on a column's values.
    pub fn data(mut self, column: impl Into<String>, condition: impl Into<Condition>) -> Self {
        self.set_data(column, condition);
        self
    }

    /// Adds a table-level constraint.
    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.add_constraint(constraint);
        self
    }

    pub fn set_meta(&mut self, property: MetaProperty, condition: impl Into<Condition>) {
        upsert(&mut self.meta, property, condition.into());
    }

    pub fn set_data(&mut self, column: impl Into<String>, condition: impl Into<Condition>) {
        upsert(&mut self.data, column.into(), condition.into());
    }

    /// Adds a table-level constraint, replacing one with the same name.
    pub fn add_constraint(&mut self, constraint: TableConstraint) {
        match self
            .constraints
            .iter_mut()
            .find(|c| c.name() == constraint.name())
        {
            Some(slot) => *slot = constraint,
            None => self.constraints.push(constraint),
        }
    }

    /// Merges another schema into this one; its declarations win.
    pub fn merge(&mut self, other: Schema) {
        for (property, condition) in other.meta {
            upsert(&mut self.meta, property, condition);
        }
        for (column, condition) in other.data {
            upsert(&mut self.data, column, condition);
        }
        for constraint in other.constraints {
            self.add_constraint(constraint);
        }
    }

    pub fn meta_conditions(&self) -> &[(MetaProperty, Condition)] {
        &self.meta
    }

    pub fn data_conditions(&self) -> &[(String, Condition)] {
        &self.data
    }

    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    /// Returns true when no namespace declares anything.
    pub fn is_empty(&self) -> bool {
        self.meta.is_empty() && self.data.is_empty() && self.constraints.is_empty()
    }
}
