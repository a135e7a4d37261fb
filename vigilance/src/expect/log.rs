//! The expectation accumulator and its report.

use serde::Serialize;
use std::fmt::Write;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::logging::{truncate_field, LogConfig};

/// Where an `expect!` invocation sits in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallSite {
    /// Path of the source file as given by `file!()`
    pub file: &'static str,
    pub line: u32,
    /// Name of the enclosing function
    pub function: &'static str,
}

impl CallSite {
    pub fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// The file name without its directories.
    pub fn file_name(&self) -> &'static str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }
}

/// One evaluated item of an `expect!` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    pub passed: bool,
    /// Source text of the expression
    pub expression: &'static str,
    pub message: Option<String>,
}

impl Expectation {
    pub fn new(passed: bool, expression: &'static str) -> Self {
        Self {
            passed,
            expression,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A false expectation, kept until the log is cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    /// 1-based position of the item within its `expect!` call
    pub position: usize,
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
    pub expression: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How [`ExpectationLog::report`] delivers its report.
///
/// # Examples
///
/// ```rust
/// use vigilance::expect::ReportOptions;
///
/// let options = ReportOptions::default().with_clear(true);
/// assert!(options.display && options.clear && !options.error);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Print the report to stdout
    pub display: bool,
    /// Empty the log after rendering
    pub clear: bool,
    /// Return the report as an error instead of printing it
    pub error: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            display: true,
            clear: false,
            error: false,
        }
    }
}

impl ReportOptions {
    /// Renders without printing anything.
    pub fn quiet() -> Self {
        Self {
            display: false,
            ..Self::default()
        }
    }

    /// Fails with [`FailedExpectations`] when anything was recorded.
    pub fn strict() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn with_clear(mut self, clear: bool) -> Self {
        self.clear = clear;
        self
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }
}

/// Recorded expectations failed and the report was requested in strict mode.
///
/// Displays as the rendered report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{report}")]
pub struct FailedExpectations {
    count: usize,
    report: String,
}

impl FailedExpectations {
    /// Number of failures in the report.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn report(&self) -> &str {
        &self.report
    }
}

/// An accumulator of failed expectations.
///
/// Records are appended by `expect_in!` (or [`ExpectationLog::record`]) and
/// stay until the log is cleared, so consecutive reports without a clear see
/// the same failures plus any new ones.
///
/// # Examples
///
/// ```rust
/// use vigilance::expect::{ExpectationLog, ReportOptions};
/// use vigilance::expect_in;
///
/// let mut log = ExpectationLog::new();
/// let rows = 3;
/// expect_in!(log; (rows > 10, "too few rows"), (rows < 100, "too many rows"));
///
/// assert_eq!(log.len(), 1);
/// let report = log.report(ReportOptions::quiet()).unwrap();
/// assert!(report.contains("    \"rows > 10\" is not True\n        -- too few rows\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpectationLog {
    records: Vec<FailureRecord>,
    log_config: LogConfig,
}

impl ExpectationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Records every false item of one `expect!` call and returns how many
    /// failed.
    pub fn record<I>(&mut self, site: CallSite, items: I) -> usize
    where
        I: IntoIterator<Item = Expectation>,
    {
        let before = self.records.len();
        for (offset, item) in items.into_iter().enumerate() {
            if item.passed {
                continue;
            }
            if self.log_config.log_expectations {
                debug!(
                    file = site.file_name(),
                    line = site.line,
                    function = site.function,
                    expression = %truncate_field(item.expression, self.log_config.max_field_length),
                    "expectation failed"
                );
            }
            self.records.push(FailureRecord {
                position: offset + 1,
                file: site.file_name(),
                line: site.line,
                function: site.function,
                expression: item.expression,
                message: item.message,
            });
        }
        self.records.len() - before
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Renders the report text, or an empty string when nothing failed.
    pub fn render(&self) -> String {
        if self.records.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = write_records(&mut out, &self.records);
        out
    }

    /// Renders the accumulated failures and delivers them as `options` asks.
    ///
    /// With nothing recorded, `All expectations met.` is printed (when
    /// displaying) and an empty string is returned. In error mode the log
    /// is always emptied, since its contents travel with the error.
    #[instrument(skip_all, fields(failures = self.records.len()))]
    pub fn report(&mut self, options: ReportOptions) -> Result<String, FailedExpectations> {
        if self.records.is_empty() {
            if options.display && !options.error {
                print!("All expectations met.");
            }
            return Ok(String::new());
        }

        let report = self.render();
        let count = self.records.len();
        if options.error {
            self.clear();
            return Err(FailedExpectations { count, report });
        }
        if options.clear {
            self.clear();
        }
        if options.display {
            print!("{report}");
        }
        Ok(report)
    }
}

fn write_records(out: &mut String, records: &[FailureRecord]) -> std::fmt::Result {
    write!(out, "\nFailed Expectations: {}\n\n", records.len())?;
    for (idx, record) in records.iter().enumerate() {
        writeln!(
            out,
            "{}: File {}, line {}, in {}()",
            idx + 1,
            record.file,
            record.line,
            record.function
        )?;
        writeln!(out, "    \"{}\" is not True", record.expression)?;
        if let Some(message) = &record.message {
            writeln!(out, "        -- {message}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
