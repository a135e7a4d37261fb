//! Core validation types: tables, schemas, the validator and its results.
//!
//! ## Overview
//!
//! - **[`Table`]**: an Arrow record batch with an optional index column
//! - **[`Schema`]**: named conditions in the meta, data and constraints
//!   namespaces
//! - **[`Validator`]**: applies a schema to tables and keeps the errors of
//!   the latest call
//! - **[`ErrorLog`]**: those errors, grouped by [`Bucket`]
//!
//! ## Architecture
//!
//! ```text
//! Schema
//!     ├── meta          row-count, column-count, columns, index, dtypes
//!     ├── data          column name -> condition over its values
//!     └── constraints   named checks over the whole table
//!
//! Validator::validate(&Table) -> ErrorLog { meta, data, constraints }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Int64Array, StringArray};
//! use vigilance::constraints::{Contains, Min};
//! use vigilance::core::{MetaProperty, Schema, Table, Validator};
//!
//! let table = Table::try_from_columns(vec![
//!     ("cyl", Arc::new(Int64Array::from(vec![4, 6, 8])) as ArrayRef),
//!     ("name", Arc::new(StringArray::from(vec!["a", "b", "c"])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let mut validator = Validator::with_schema(
//!     Schema::new()
//!         .meta(MetaProperty::Columns, Contains::new(["cyl", "name"]).only())
//!         .data("cyl", Min::new(4)),
//! );
//! assert!(validator.validate(&table).unwrap());
//! assert_eq!(
//!     validator.render_report().unwrap(),
//!     "Validation Successful: No errors found.\n"
//! );
//! ```

pub mod dtype;
mod result;
mod schema;
mod table;
mod validator;

pub use dtype::{dtype_token, is_recognized, RECOGNIZED_DTYPES};
pub use result::{Bucket, ErrorEntry, ErrorLog};
pub use schema::{MetaProperty, Schema, TableConstraint};
pub use table::{array_values, Table};
pub use validator::{ValidationState, Validator};
