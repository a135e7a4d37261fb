//! Delayed assertions.
//!
//! [`expect!`](crate::expect!) evaluates a batch of boolean expressions and,
//! instead of panicking, records every false one together with where it was
//! written: file, line, enclosing function and the expression's source text.
//! The caller decides later whether to print the collected failures, return
//! them as an error, or clear them.
//!
//! Each thread owns a default log used by `expect!` and [`report_failures`];
//! `expect_in!` records into an explicit [`ExpectationLog`] instead.
//!
//! ## Example
//!
//! ```rust
//! use vigilance::expect;
//! use vigilance::expect::{report_failures, ReportOptions};
//!
//! fn check_rows(rows: &[i64]) {
//!     expect!(
//!         (rows.len() <= 3, "too many rows"),
//!         (rows.iter().all(|r| *r >= 0), "negative row"),
//!     );
//! }
//!
//! check_rows(&[1, -2, 3, 4]);
//! let report = report_failures(ReportOptions::quiet().with_clear(true)).unwrap();
//!
//! assert!(report.starts_with("\nFailed Expectations: 2\n\n1: File "));
//! assert!(report.contains(", in check_rows()\n    \"rows.len() <= 3\" is not True\n        -- too many rows\n"));
//! ```

mod log;

use std::cell::RefCell;

pub use log::{
    CallSite, Expectation, ExpectationLog, FailedExpectations, FailureRecord, ReportOptions,
};

thread_local! {
    static DEFAULT_LOG: RefCell<ExpectationLog> = RefCell::new(ExpectationLog::new());
}

/// Records into the current thread's default log.
#[doc(hidden)]
pub fn record_default<I>(site: CallSite, items: I) -> usize
where
    I: IntoIterator<Item = Expectation>,
{
    DEFAULT_LOG.with(|log| log.borrow_mut().record(site, items))
}

/// Reports the failures in the current thread's default log.
///
/// See [`ExpectationLog::report`].
pub fn report_failures(options: ReportOptions) -> Result<String, FailedExpectations> {
    DEFAULT_LOG.with(|log| log.borrow_mut().report(options))
}

/// Failures currently held by the current thread's default log.
pub fn pending_failures() -> Vec<FailureRecord> {
    DEFAULT_LOG.with(|log| log.borrow().failures().to_vec())
}

/// Empties the current thread's default log without reporting.
pub fn clear_failures() {
    DEFAULT_LOG.with(|log| log.borrow_mut().clear());
}

/// Reduces the `type_name` of a marker item to its enclosing function name.
#[doc(hidden)]
pub fn enclosing_function(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::__here").unwrap_or(path);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    path.rsplit("::").next().unwrap_or(path)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::expect::enclosing_function(type_name_of(__here))
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __call_site {
    () => {
        $crate::expect::CallSite::new(::std::file!(), ::std::line!(), $crate::__function_name!())
    };
}

/// Records false expressions in the current thread's expectation log.
///
/// Two forms are accepted, one per call:
///
/// - `expect!(a, b, ...)`: plain boolean expressions
/// - `expect!((a, "msg"), (b, "msg"), ...)`: parenthesized pairs of an
///   expression and a message
///
/// Every item is evaluated, in order. Returns the number of failures
/// recorded by this call.
///
/// ```rust
/// let n = 11;
/// assert_eq!(vigilance::expect!(n <= 10, n % 2 == 1), 1);
/// # vigilance::expect::clear_failures();
/// ```
#[macro_export]
macro_rules! expect {
    ($(($cond:expr, $msg:expr)),+ $(,)?) => {
        $crate::expect::record_default(
            $crate::__call_site!(),
            [$(
                $crate::expect::Expectation::new($cond, ::std::stringify!($cond))
                    .with_message(::std::string::String::from($msg))
            ),+],
        )
    };
    ($($cond:expr),+ $(,)?) => {
        $crate::expect::record_default(
            $crate::__call_site!(),
            [$($crate::expect::Expectation::new($cond, ::std::stringify!($cond))),+],
        )
    };
}

/// Like [`expect!`](crate::expect!), but records into an explicit
/// [`ExpectationLog`]: `expect_in!(log; a, b)`.
#[macro_export]
macro_rules! expect_in {
    ($log:expr; $(($cond:expr, $msg:expr)),+ $(,)?) => {
        $log.record(
            $crate::__call_site!(),
            [$(
                $crate::expect::Expectation::new($cond, ::std::stringify!($cond))
                    .with_message(::std::string::String::from($msg))
            ),+],
        )
    };
    ($log:expr; $($cond:expr),+ $(,)?) => {
        $log.record(
            $crate::__call_site!(),
            [$($crate::expect::Expectation::new($cond, ::std::stringify!($cond))),+],
        )
    };
}
