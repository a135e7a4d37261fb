//! Report formatting for validation errors.
//!
//! This module provides formatters that turn the [`ErrorLog`] of a
//! validation pass into text: the plain console report, JSON for
//! programmatic consumption, or Markdown for documentation.
//!
//! # Examples
//!
//! ```rust
//! use vigilance::core::{Bucket, ErrorEntry, ErrorLog};
//! use vigilance::formatters::{HumanFormatter, ResultFormatter};
//!
//! let mut log = ErrorLog::new();
//! log.push(Bucket::Meta, ErrorEntry::new("row-count", "value must be at least 5", None));
//!
//! let text = HumanFormatter::new().format(&log).unwrap();
//! assert_eq!(
//!     text,
//!     "\nError Report\n------------\nmeta:\n    row-count:  value must be at least 5\n"
//! );
//! ```

use serde::Serialize;
use std::fmt::Write;

use crate::core::{Bucket, ErrorEntry, ErrorLog};
use crate::error::{Result, VigilanceError};

/// Configuration options for formatting reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Maximum number of errors to display per bucket (`None` for all)
    pub max_errors: Option<usize>,
    /// Whether to include the violation kind of each error
    pub include_kinds: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            max_errors: None,
            include_kinds: false,
        }
    }
}

impl FormatterConfig {
    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            max_errors: Some(50),
            include_kinds: true,
        }
    }

    /// Sets the maximum number of errors to display per bucket.
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// Sets whether to include violation kinds.
    pub fn with_kinds(mut self, include: bool) -> Self {
        self.include_kinds = include;
        self
    }

    fn visible<'a>(&self, entries: &'a [ErrorEntry]) -> (&'a [ErrorEntry], usize) {
        match self.max_errors {
            Some(max) if entries.len() > max => (&entries[..max], entries.len() - max),
            _ => (entries, 0),
        }
    }
}

/// Trait for formatting validation errors into different output formats.
///
/// # Examples
///
/// ```rust
/// use vigilance::core::ErrorLog;
/// use vigilance::formatters::ResultFormatter;
///
/// struct CountFormatter;
///
/// impl ResultFormatter for CountFormatter {
///     fn format(&self, log: &ErrorLog) -> vigilance::prelude::Result<String> {
///         Ok(format!("{} errors", log.len()))
///     }
/// }
///
/// assert_eq!(CountFormatter.format(&ErrorLog::new()).unwrap(), "0 errors");
/// ```
pub trait ResultFormatter {
    /// Formats an error log into a string representation.
    fn format(&self, log: &ErrorLog) -> Result<String>;

    /// Formats an error log with custom configuration.
    fn format_with_config(&self, log: &ErrorLog, _config: &FormatterConfig) -> Result<String> {
        self.format(log)
    }
}

/// The plain-text console report.
///
/// A passing log renders as `Validation Successful: No errors found.`. A
/// failing one lists every non-empty bucket in the order meta, data,
/// constraints, with one indented `property:  message` line per error.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, log: &ErrorLog) -> Result<String> {
        self.format_with_config(log, &self.config)
    }

    fn format_with_config(&self, log: &ErrorLog, config: &FormatterConfig) -> Result<String> {
        if log.is_empty() {
            return Ok("Validation Successful: No errors found.\n".to_string());
        }

        let mut output = String::new();
        write_report(&mut output, log, config)
            .map_err(|e| VigilanceError::Serialization(format!("Failed to render report: {e}")))?;
        Ok(output)
    }
}

fn write_report(output: &mut String, log: &ErrorLog, config: &FormatterConfig) -> std::fmt::Result {
    writeln!(output)?;
    writeln!(output, "Error Report")?;
    writeln!(output, "------------")?;
    for bucket in Bucket::ALL {
        let entries = log.bucket(bucket);
        if entries.is_empty() {
            continue;
        }
        writeln!(output, "{bucket}:")?;
        let (shown, hidden) = config.visible(entries);
        for entry in shown {
            match entry.kind.filter(|_| config.include_kinds) {
                Some(kind) => {
                    writeln!(output, "    {}:  [{kind}] {}", entry.property, entry.message)?
                }
                None => writeln!(output, "    {}:  {}", entry.property, entry.message)?,
            }
        }
        if hidden > 0 {
            writeln!(output, "    ... {hidden} more")?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    error_count: usize,
    errors: &'a ErrorLog,
}

/// Formats the error log as structured JSON.
///
/// # Examples
///
/// ```rust
/// use vigilance::core::ErrorLog;
/// use vigilance::formatters::{JsonFormatter, ResultFormatter};
///
/// let json = JsonFormatter::new().with_pretty(false).format(&ErrorLog::new()).unwrap();
/// assert!(json.starts_with(r#"{"passed":true,"error_count":0"#));
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Sets whether to use pretty-printed JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, log: &ErrorLog) -> Result<String> {
        let report = JsonReport {
            passed: log.is_empty(),
            error_count: log.len(),
            errors: log,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| {
            VigilanceError::Serialization(format!("Failed to serialize report to JSON: {e}"))
        })
    }
}

/// Formats the error log as a Markdown table per bucket.
///
/// Bucket headings sit one level below the title, never deeper than `######`.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    heading_level: u8,
    config: FormatterConfig,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            heading_level: 2,
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            ..Self::new()
        }
    }

    /// Sets the heading level of the report title (1-6).
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 6);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes text for a single Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, log: &ErrorLog) -> Result<String> {
        self.format_with_config(log, &self.config)
    }

    fn format_with_config(&self, log: &ErrorLog, config: &FormatterConfig) -> Result<String> {
        let title = "#".repeat(usize::from(self.heading_level));
        let section = "#".repeat(usize::from((self.heading_level + 1).min(6)));
        let mut output = String::new();
        let render = |output: &mut String| -> std::fmt::Result {
            writeln!(output, "{title} Validation Report")?;
            writeln!(output)?;
            if log.is_empty() {
                writeln!(output, "No errors found.")?;
                return Ok(());
            }
            for bucket in Bucket::ALL {
                let entries = log.bucket(bucket);
                if entries.is_empty() {
                    continue;
                }
                writeln!(output, "{section} {bucket}")?;
                writeln!(output)?;
                writeln!(output, "| Property | Message |")?;
                writeln!(output, "|----------|---------|")?;
                let (shown, hidden) = config.visible(entries);
                for entry in shown {
                    let message = match entry.kind.filter(|_| config.include_kinds) {
                        Some(kind) => format!("[{kind}] {}", entry.message),
                        None => entry.message.clone(),
                    };
                    writeln!(
                        output,
                        "| {} | {} |",
                        table_cell(&entry.property),
                        table_cell(&message)
                    )?;
                }
                writeln!(output)?;
                if hidden > 0 {
                    writeln!(output, "_... {hidden} more_")?;
                    writeln!(output)?;
                }
            }
            Ok(())
        };
        render(&mut output)
            .map_err(|e| VigilanceError::Serialization(format!("Failed to render report: {e}")))?;
        Ok(output)
    }
}
