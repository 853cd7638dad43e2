//! Rendering of validation reports.
//!
//! Formatters turn a [`ValidationReport`] into JSON for programmatic
//! consumption, plain text for consoles and logs, or Markdown for documents.
//! They only render; storing reports is left to the caller.
//!
//! # Examples
//!
//! ```rust
//! use term_assay::core::{AggregationRule, ValidationReport};
//! use term_assay::formatters::{HumanFormatter, ResultFormatter};
//!
//! let report = ValidationReport::new("orders", "2024-01-01T00:00:00Z", AggregationRule::All, vec![], 0);
//! let output = HumanFormatter::new().format(&report).unwrap();
//! assert!(output.contains("Validation PASSED"));
//! ```

use crate::core::{EntryReport, Level, ValidationReport};
use crate::prelude::*;
use serde_json::Value;
use std::fmt::Write;

macro_rules! out {
    ($output:expr) => {
        writeln!($output).map_err(format_error)?
    };
    ($output:expr, $($arg:tt)*) => {
        writeln!($output, $($arg)*).map_err(format_error)?
    };
}

fn format_error(e: std::fmt::Error) -> TermError {
    TermError::Internal(format!("Failed to format report: {e}"))
}

/// Configuration options for formatting validation reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include run metrics in output
    pub include_metrics: bool,
    /// Include entry reports (failed ones only for text formats)
    pub include_entries: bool,
    /// Include each entry's statement detail
    pub include_details: bool,
    /// Maximum number of entries to display (-1 for all)
    pub max_entries: i32,
    /// Whether to use colorized output (for human formatter)
    pub use_colors: bool,
    /// Whether to include timestamps in output
    pub include_timestamps: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_entries: true,
            include_details: true,
            max_entries: -1,
            use_colors: true,
            include_timestamps: true,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the summary.
    pub fn minimal() -> Self {
        Self {
            include_metrics: true,
            include_entries: false,
            include_details: false,
            max_entries: 0,
            use_colors: false,
            include_timestamps: false,
        }
    }

    /// Creates a configuration suitable for CI/CD environments.
    pub fn ci() -> Self {
        Self {
            include_metrics: true,
            include_entries: true,
            include_details: false,
            max_entries: 50,
            use_colors: false,
            include_timestamps: true,
        }
    }

    pub fn with_metrics(mut self, include: bool) -> Self {
        self.include_metrics = include;
        self
    }

    pub fn with_entries(mut self, include: bool) -> Self {
        self.include_entries = include;
        self
    }

    pub fn with_details(mut self, include: bool) -> Self {
        self.include_details = include;
        self
    }

    /// Sets the maximum number of entries to display.
    pub fn with_max_entries(mut self, max: i32) -> Self {
        self.max_entries = max;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn limit<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.max_entries < 0 {
            items
        } else {
            &items[..items.len().min(self.max_entries as usize)]
        }
    }
}

/// Trait for rendering validation reports.
///
/// # Examples
///
/// ```rust
/// use term_assay::core::ValidationReport;
/// use term_assay::formatters::ResultFormatter;
///
/// struct Verdict;
///
/// impl ResultFormatter for Verdict {
///     fn format(&self, report: &ValidationReport) -> term_assay::prelude::Result<String> {
///         Ok(format!("{}: {}", report.suite_name, report.passed))
///     }
/// }
/// ```
pub trait ResultFormatter {
    /// Formats a validation report into a string representation.
    fn format(&self, report: &ValidationReport) -> Result<String>;

    /// Formats a validation report with custom configuration.
    fn format_with_config(
        &self,
        report: &ValidationReport,
        _config: &FormatterConfig,
    ) -> Result<String> {
        self.format(report)
    }
}

/// Formats validation reports as JSON.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    config: FormatterConfig,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            pretty: true,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            pretty: true,
        }
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
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let filtered = filter_report(report, config);
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&filtered)
        } else {
            serde_json::to_string(&filtered)
        };
        rendered.map_err(|e| TermError::Internal(format!("Failed to serialize report to JSON: {e}")))
    }
}

/// Formats validation reports as console text.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a new human formatter with default configuration.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{color}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Critical => "35",
        Level::Error => "31",
        Level::Warning => "33",
        Level::Info => "34",
    }
}

fn compact(detail: &serde_json::Map<String, Value>) -> String {
    Value::Object(detail.clone()).to_string()
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let colors = config.use_colors;

        out!(output);
        if report.passed {
            out!(output, "{}", paint("Validation PASSED", "32", colors));
        } else {
            out!(output, "{}", paint("Validation FAILED", "31", colors));
        }
        out!(output);
        out!(output, "Suite: {}", report.suite_name);
        if config.include_timestamps {
            out!(output, "Timestamp: {}", report.timestamp);
        }

        if config.include_metrics {
            let metrics = &report.metrics;
            out!(output);
            out!(output, "Summary:");
            out!(output, "   Total Statements: {}", metrics.total_statements);
            out!(
                output,
                "   Passed: {}",
                paint(&metrics.passed_statements.to_string(), "32", colors)
            );
            out!(
                output,
                "   Failed: {}",
                paint(&metrics.failed_statements.to_string(), "31", colors)
            );
            if metrics.errored_statements > 0 {
                out!(output, "   Errored: {}", metrics.errored_statements);
            }
            out!(output, "   Success Rate: {:.1}%", metrics.success_rate());
            out!(output, "   Execution Time: {}ms", metrics.execution_time_ms);
        }

        let failed: Vec<&EntryReport> = report.failed_entries().collect();
        if config.include_entries && !failed.is_empty() {
            out!(output);
            out!(output, "Failed Statements:");
            let shown = config.limit(&failed);
            for entry in shown {
                out!(output);
                out!(
                    output,
                    "   #{} {} [{}]",
                    entry.index,
                    entry.statement_type,
                    paint(entry.severity.as_str(), level_color(entry.severity), colors)
                );
                out!(output, "      Location: {}", entry.location);
                if config.include_details {
                    out!(output, "      Detail: {}", compact(&entry.report.detail));
                }
            }
            if failed.len() > shown.len() {
                out!(output);
                out!(
                    output,
                    "   ... and {} more failed statements",
                    failed.len() - shown.len()
                );
            }
        }

        out!(output);
        Ok(output)
    }
}

/// Formats validation reports as Markdown.
#[derive(Debug, Clone)]
pub struct MarkdownFormatter {
    config: FormatterConfig,
    heading_level: u8,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            heading_level: 2,
        }
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self {
            config,
            heading_level: 2,
        }
    }

    /// Sets the base heading level for the output.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.heading_level = level.clamp(1, 5);
        self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFormatter for MarkdownFormatter {
    fn format(&self, report: &ValidationReport) -> Result<String> {
        self.format_with_config(report, &self.config)
    }

    fn format_with_config(
        &self,
        report: &ValidationReport,
        config: &FormatterConfig,
    ) -> Result<String> {
        let mut output = String::new();
        let h = "#".repeat(self.heading_level as usize);

        let verdict = if report.passed { "PASSED" } else { "FAILED" };
        out!(output, "{h} Validation Report - {verdict}");
        out!(output);
        out!(output, "**Suite:** {}", report.suite_name);
        if config.include_timestamps {
            out!(output, "**Timestamp:** {}", report.timestamp);
        }

        if config.include_metrics {
            let metrics = &report.metrics;
            out!(output);
            out!(output, "{h}# Summary");
            out!(output);
            out!(output, "| Metric | Value |");
            out!(output, "|--------|-------|");
            out!(output, "| Total Statements | {} |", metrics.total_statements);
            out!(output, "| Passed | {} |", metrics.passed_statements);
            out!(output, "| Failed | {} |", metrics.failed_statements);
            out!(output, "| Errored | {} |", metrics.errored_statements);
            out!(output, "| Success Rate | {:.1}% |", metrics.success_rate());
            out!(output, "| Execution Time | {}ms |", metrics.execution_time_ms);
        }

        if config.include_entries && !report.entries.is_empty() {
            out!(output);
            out!(output, "{h}# Statements");
            out!(output);
            out!(output, "| # | Type | Severity | Location | Result |");
            out!(output, "|---|------|----------|----------|--------|");
            let shown = config.limit(&report.entries);
            for entry in shown {
                let result = if entry.errored() {
                    "error"
                } else if entry.passed() {
                    "pass"
                } else {
                    "fail"
                };
                out!(
                    output,
                    "| {} | `{}` | {} | {} | {result} |",
                    entry.index,
                    entry.statement_type,
                    entry.severity,
                    entry.location
                );
            }
            if report.entries.len() > shown.len() {
                out!(output);
                out!(
                    output,
                    "> **Note:** {} additional statements not shown.",
                    report.entries.len() - shown.len()
                );
            }
        }

        Ok(output)
    }
}

fn filter_report(report: &ValidationReport, config: &FormatterConfig) -> ValidationReport {
    let mut filtered = report.clone();

    if !config.include_entries {
        filtered.entries.clear();
    } else if config.max_entries >= 0 {
        filtered.entries.truncate(config.max_entries as usize);
    }
    if !config.include_details {
        for entry in &mut filtered.entries {
            entry.report.detail.clear();
        }
    }
    if !config.include_timestamps {
        filtered.timestamp = String::new();
    }

    filtered
}
