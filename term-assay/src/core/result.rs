//! Validation report types.

use super::{Level, Location, StatementReport};
use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// How the overall verdict is aggregated from entry results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule", content = "level")]
pub enum AggregationRule {
    /// Every entry must pass
    #[default]
    All,
    /// Only entries at or above the level contribute
    AtLeast(Level),
}

impl AggregationRule {
    /// Whether an entry of the given severity contributes to the verdict.
    pub fn applies_to(&self, severity: Level) -> bool {
        match self {
            AggregationRule::All => true,
            AggregationRule::AtLeast(level) => severity.is_at_least(*level),
        }
    }
}

/// The report of one configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryReport {
    /// Zero-based position in the configuration
    pub index: usize,
    /// Statement type identifier
    #[serde(rename = "type")]
    pub statement_type: String,
    /// Severity label copied from the configuration
    pub severity: Level,
    /// Scope the statement was evaluated on
    pub location: Location,
    #[serde(flatten)]
    pub report: StatementReport,
}

impl EntryReport {
    /// Whether the statement was fulfilled.
    pub fn passed(&self) -> bool {
        self.report.result
    }

    /// Whether the entry failed to run (continue-on-error mode only).
    pub fn errored(&self) -> bool {
        self.report.is_error()
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    /// Number of entries evaluated
    pub total_statements: usize,
    /// Entries whose statement was fulfilled
    pub passed_statements: usize,
    /// Entries whose statement was not fulfilled, errored entries included
    pub failed_statements: usize,
    /// Entries that failed to run
    pub errored_statements: usize,
    /// Wall-clock time of the run in milliseconds
    pub execution_time_ms: u64,
}

impl ValidationMetrics {
    /// Tallies entry outcomes.
    pub fn from_entries(entries: &[EntryReport], execution_time_ms: u64) -> Self {
        let passed = entries.iter().filter(|e| e.passed()).count();
        Self {
            total_statements: entries.len(),
            passed_statements: passed,
            failed_statements: entries.len() - passed,
            errored_statements: entries.iter().filter(|e| e.errored()).count(),
            execution_time_ms,
        }
    }

    /// Returns the success rate as a percentage (0.0 to 100.0).
    pub fn success_rate(&self) -> f64 {
        if self.total_statements == 0 {
            100.0
        } else {
            (self.passed_statements as f64 / self.total_statements as f64) * 100.0
        }
    }
}

/// The aggregated outcome of a validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The name of the suite or document that was run
    pub suite_name: String,
    /// Timestamp when the run started (ISO 8601 format)
    pub timestamp: String,
    /// Overall verdict under the aggregation rule
    pub passed: bool,
    /// Rule used to compute `passed`
    pub aggregation: AggregationRule,
    /// One entry per configuration, in configuration order
    pub entries: Vec<EntryReport>,
    /// Counts of passed, failed and errored entries
    pub metrics: ValidationMetrics,
}

impl ValidationReport {
    /// Builds a report, computing the verdict and metrics from `entries`.
    pub fn new(
        suite_name: impl Into<String>,
        timestamp: impl Into<String>,
        aggregation: AggregationRule,
        entries: Vec<EntryReport>,
        execution_time_ms: u64,
    ) -> Self {
        let passed = entries
            .iter()
            .filter(|e| aggregation.applies_to(e.severity))
            .all(EntryReport::passed);
        let metrics = ValidationMetrics::from_entries(&entries, execution_time_ms);
        Self {
            suite_name: suite_name.into(),
            timestamp: timestamp.into(),
            passed,
            aggregation,
            entries,
            metrics,
        }
    }

    /// Entries whose statement was not fulfilled.
    pub fn failed_entries(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| !e.passed())
    }

    /// Failed entries at or above `level`.
    pub fn failures_at_least(&self, level: Level) -> impl Iterator<Item = &EntryReport> {
        self.failed_entries()
            .filter(move |e| e.severity.is_at_least(level))
    }

    /// Returns [`TermError::ValidationFailed`] if any entry at or above
    /// `level` failed, and the report otherwise.
    pub fn raise_for(self, level: Level) -> Result<Self> {
        let failures: Vec<String> = self
            .failures_at_least(level)
            .map(|e| format!("#{} {} ({}) on {}", e.index, e.statement_type, e.severity, e.location))
            .collect();
        if failures.is_empty() {
            return Ok(self);
        }
        Err(TermError::ValidationFailed {
            message: format!(
                "{} statement(s) at or above '{level}' failed: {}",
                failures.len(),
                failures.join("; ")
            ),
            suite: self.suite_name,
        })
    }

    /// Formats the report as JSON.
    pub fn to_json(&self) -> Result<String> {
        use crate::formatters::{JsonFormatter, ResultFormatter};
        JsonFormatter::new().format(self)
    }

    /// Formats the report as human-readable text.
    pub fn to_human(&self) -> Result<String> {
        use crate::formatters::{HumanFormatter, ResultFormatter};
        HumanFormatter::new().format(self)
    }
}
