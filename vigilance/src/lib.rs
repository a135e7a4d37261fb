//! # vigilance - Schemas and Delayed Assertions for Arrow Tables
//!
//! vigilance lets you declare what a table should look like, check table
//! snapshots against that declaration, and collect every failure instead of
//! stopping at the first one.
//!
//! ## Overview
//!
//! The crate has two independent halves:
//!
//! - **Schema validation**: a [`Schema`](core::Schema) maps table properties
//!   (row count, column names, index labels, dtypes, column values) to
//!   [`Condition`](constraints::Condition)s. A [`Validator`](core::Validator)
//!   applies it to a [`Table`](core::Table) and records failures in three
//!   buckets: `meta`, `data` and `constraints`.
//! - **Delayed assertions**: [`expect!`] evaluates boolean expressions and
//!   records the false ones with their file, line, enclosing function and
//!   source text, to be reported later.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{ArrayRef, Float64Array, Int64Array};
//! use vigilance::prelude::*;
//!
//! let table = Table::try_from_columns(vec![
//!     ("mpg", Arc::new(Float64Array::from(vec![21.0, 22.8, 18.7])) as ArrayRef),
//!     ("vs", Arc::new(Int64Array::from(vec![0, 1, 2])) as ArrayRef),
//! ])
//! .unwrap();
//!
//! let schema = Schema::new()
//!     .meta(MetaProperty::RowCount, Range::between(5, 11))
//!     .meta(MetaProperty::Columns, Contains::new(["mpg", "vs"]))
//!     .data("vs", Contains::new([0, 1]).only());
//!
//! let mut validator = Validator::with_schema(schema);
//! assert!(!validator.validate(&table).unwrap());
//! assert_eq!(
//!     validator.render_report().unwrap(),
//!     "\nError Report\n------------\n\
//!      meta:\n    row-count:  value must be at least 5\n\
//!      data:\n    vs:  sequence must only contain the following: [0, 1]\nAdditional: [2]\n"
//! );
//! ```
//!
//! ## Delayed Assertions
//!
//! ```rust
//! use vigilance::expect;
//! use vigilance::expect::{report_failures, ReportOptions};
//!
//! fn check(values: &[f64]) {
//!     expect!(
//!         (values.len() > 2, "need more than two values"),
//!         (values.iter().all(|v| *v >= 0.0), "negative value"),
//!     );
//! }
//!
//! check(&[1.0, -1.0]);
//! let err = report_failures(ReportOptions::strict()).unwrap_err();
//! assert_eq!(err.count(), 2);
//! ```
//!
//! ## Logging
//!
//! vigilance emits `tracing` events and spans. Install a subscriber with
//! [`logging::setup::init_logging`] or your own.

pub mod config;
pub mod constraints;
pub mod core;
pub mod error;
pub mod expect;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod statistics;

#[cfg(test)]
mod test_helpers;
