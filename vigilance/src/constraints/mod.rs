//! Conditions and the predicate builders that produce them.
//!
//! A schema maps each property of a table to a [`Condition`]. Conditions are
//! either exact targets, compared by equality, or predicates built from the
//! types in this module:
//!
//! - **[`Range`]**, **[`Min`]**, **[`Max`]**: numeric bounds with optional
//!   exclusive ends
//! - **[`Contains`]**: required members of a sequence, optionally exclusive
//! - **[`Excludes`]**: forbidden members of a sequence
//! - **[`predicate_fn`]**: any closure over a [`Value`]
//!
//! A predicate that fails returns a [`ConditionViolation`] carrying its
//! [`ViolationKind`] and a human-readable message.
//!
//! ## Example
//!
//! ```rust
//! use vigilance::constraints::{Condition, Contains, Outcome, Range, Value};
//!
//! let rows: Condition = Range::between(5, 11).into();
//! assert_eq!(rows.evaluate(&Value::from(8)), Outcome::Passed);
//!
//! let columns: Condition = Contains::new(["mpg", "cyl"]).only().into();
//! let outcome = columns.evaluate(&Value::from(vec!["mpg", "cyl", "hp"]));
//! assert!(outcome.message().unwrap().contains("Additional: ['hp']"));
//! ```

mod condition;
mod membership;
mod predicate;
mod range;
mod value;
mod violation;

pub use condition::{Condition, Outcome};
pub use membership::{Contains, Excludes};
pub use predicate::{predicate_fn, FnPredicate, Predicate};
pub use range::{BoundValue, Max, Min, Range};
pub use value::{format_items, Value};
pub use violation::{ConditionViolation, ViolationKind};
