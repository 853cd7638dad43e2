//! Validation orchestrator: runs ordered statement configurations against a
//! typed table.

use super::statement::{check_scope, select_columns};
use super::{
    AggregationRule, EntryReport, Statement, StatementConfig, StatementRegistry, StatementReport,
    ValidationDocument, ValidationReport,
};
use crate::coercion::{CoercedTable, Coercer, TypingOptions};
use crate::logging::truncate_field;
use crate::prelude::*;
use crate::{log_coercion, log_statement, perf_debug};
use arrow::record_batch::RecordBatch;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// What the orchestrator does when an entry fails to resolve, construct,
/// slice or evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the run with the error attributed to the entry
    #[default]
    Abort,
    /// Record the entry as failed with the error in its detail
    ContinueOnError,
}

/// A configured validation run.
///
/// A suite binds a statement registry to execution settings. The same suite
/// can run any number of configurations against any number of tables.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use arrow::array::Int64Array;
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use term_assay::core::{Level, Location, StatementConfig, ValidationSuite};
///
/// # async fn example() -> term_assay::prelude::Result<()> {
/// let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, true)]));
/// let table = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1, 2, 3]))])?;
///
/// let suite = ValidationSuite::builder("orders").build();
/// let report = suite
///     .run(
///         &table,
///         &[
///             StatementConfig::new("not_null", Location::column("id")).with_severity(Level::Error),
///             StatementConfig::new("unique", Location::column("id")),
///         ],
///     )
///     .await?;
/// assert!(report.passed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ValidationSuite {
    name: String,
    description: Option<String>,
    registry: Arc<StatementRegistry>,
    error_policy: ErrorPolicy,
    aggregation: AggregationRule,
    /// Maximum entries evaluated at once; 1 means sequential
    concurrency: usize,
    time_budget: Option<Duration>,
    log_config: LogConfig,
}

/// An entry after resolution, construction and slicing.
type PreparedEntry = Result<(Box<dyn Statement>, RecordBatch)>;

enum Outcome {
    Report(StatementReport),
    Failed(TermError),
    OutOfTime,
}

impl ValidationSuite {
    /// Creates a new builder for constructing a validation suite.
    pub fn builder(name: impl Into<String>) -> ValidationSuiteBuilder {
        ValidationSuiteBuilder::new(name)
    }

    /// Returns the name of the suite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description of the suite.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the statement registry.
    pub fn registry(&self) -> &StatementRegistry {
        &self.registry
    }

    /// Returns what happens when an entry fails.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Returns the rule deciding the overall outcome.
    pub fn aggregation(&self) -> AggregationRule {
        self.aggregation
    }

    /// Returns how many entries may be evaluated at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Validates `table` against `configs`.
    ///
    /// Every entry is resolved, constructed and sliced before any statement
    /// is evaluated, so configuration mistakes surface before any work is
    /// done. Entries are then evaluated, concurrently when enabled, and
    /// reported in configuration order.
    ///
    /// # Errors
    ///
    /// Under [`ErrorPolicy::Abort`], the first failing entry's error wrapped
    /// in [`TermError::Entry`]. [`TermError::DeadlineExceeded`] when the time
    /// budget runs out before an entry starts, under either policy.
    #[instrument(skip(self, table, configs), fields(
        suite.name = %self.name,
        suite.statements = configs.len(),
        suite.concurrency = self.concurrency,
        table.rows = table.num_rows()
    ))]
    pub async fn run(
        &self,
        table: &RecordBatch,
        configs: &[StatementConfig],
    ) -> Result<ValidationReport> {
        info!(
            suite.name = %self.name,
            suite.statements = configs.len(),
            suite.description = ?self.description,
            "Starting validation suite"
        );
        let start_time = Instant::now();
        let timestamp = chrono::Utc::now().to_rfc3339();
        let deadline = self.time_budget.map(|budget| start_time + budget);

        let mut prepared = Vec::with_capacity(configs.len());
        for (index, config) in configs.iter().enumerate() {
            match self.prepare(table, config) {
                Err(e) if self.error_policy == ErrorPolicy::Abort => {
                    error!(
                        entry.index = index,
                        statement.type = %config.statement_type,
                        error = %e,
                        "Statement entry is invalid"
                    );
                    return Err(e.for_entry(index, &config.statement_type));
                }
                entry => prepared.push(entry),
            }
        }

        let total = configs.len();
        let mut entries = Vec::with_capacity(total);
        let mut outcomes = stream::iter(prepared.into_iter().map(|entry| {
            let spawn = self.concurrency > 1;
            async move { run_entry(entry, deadline, spawn).await }
        }))
        .buffered(self.concurrency.max(1));

        let mut index = 0;
        while let Some(outcome) = outcomes.next().await {
            let config = &configs[index];
            let report = match outcome {
                Outcome::Report(report) => {
                    log_statement!(
                        self.log_config,
                        entry.index = index,
                        statement.type = %config.statement_type,
                        statement.result = report.result,
                        statement.detail = %truncate_field(
                            &serde_json::Value::Object(report.detail.clone()).to_string(),
                            self.log_config.max_field_length
                        ),
                        "Statement evaluated"
                    );
                    report
                }
                Outcome::Failed(e) => {
                    error!(
                        entry.index = index,
                        statement.type = %config.statement_type,
                        error = %e,
                        "Statement entry failed"
                    );
                    if self.error_policy == ErrorPolicy::Abort {
                        return Err(e.for_entry(index, &config.statement_type));
                    }
                    StatementReport::from_error(&e)
                }
                Outcome::OutOfTime => {
                    warn!(
                        entry.index = index,
                        completed = entries.len(),
                        total,
                        "Validation time budget exceeded"
                    );
                    return Err(TermError::DeadlineExceeded {
                        index,
                        completed: entries.len(),
                        total,
                    });
                }
            };

            if !report.result {
                debug!(
                    entry.index = index,
                    statement.type = %config.statement_type,
                    statement.severity = %config.severity,
                    statement.location = %config.location,
                    "Statement not fulfilled"
                );
            }
            entries.push(EntryReport {
                index,
                statement_type: config.statement_type.clone(),
                severity: config.severity,
                location: config.location.clone(),
                report,
            });
            index += 1;
        }

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        let report = ValidationReport::new(
            &self.name,
            timestamp,
            self.aggregation,
            entries,
            execution_time_ms,
        );

        if self.log_config.log_metrics {
            info!(
                suite.name = %self.name,
                metrics.passed = report.metrics.passed_statements,
                metrics.failed = report.metrics.failed_statements,
                metrics.errored = report.metrics.errored_statements,
                metrics.total = report.metrics.total_statements,
                metrics.duration_ms = execution_time_ms,
                metrics.success_rate = %format!("{:.2}%", report.metrics.success_rate()),
                suite.result = %if report.passed { "passed" } else { "failed" },
                "Validation suite completed"
            );
        }
        Ok(report)
    }

    /// Validates `table` against a validation document.
    pub async fn run_document(
        &self,
        table: &RecordBatch,
        document: &ValidationDocument,
    ) -> Result<ValidationReport> {
        let mut report = self.run(table, &document.statements).await?;
        report.suite_name = document.name.clone();
        Ok(report)
    }

    /// Coerces a raw table, then validates the typed result.
    ///
    /// Coercion runs in lenient mode; its violations are returned alongside
    /// the report.
    pub async fn run_raw(
        &self,
        raw: &RecordBatch,
        typing: &TypingOptions,
        configs: &[StatementConfig],
    ) -> Result<(ValidationReport, CoercedTable)> {
        let coerced = Coercer::new().coerce(raw, typing)?;
        log_coercion!(
            self.log_config,
            suite.name = %self.name,
            table.rows = coerced.table.num_rows(),
            violations = coerced.violations.len(),
            "Raw table coerced"
        );
        let report = self.run(&coerced.table, configs).await?;
        Ok((report, coerced))
    }

    fn prepare(&self, table: &RecordBatch, config: &StatementConfig) -> PreparedEntry {
        let statement_type = self.registry.resolve(&config.statement_type)?;
        let statement = statement_type.construct(&config.statement_options())?;
        check_scope(statement_type.as_ref(), &config.location)?;
        let slice = select_columns(table, &config.location)?;
        perf_debug!(
            self.log_config,
            statement.type = %config.statement_type,
            slice.columns = slice.num_columns(),
            "Prepared statement entry"
        );
        Ok((statement, slice))
    }
}

/// Aborts a spawned evaluation when dropped before it finishes.
struct AbortOnDrop<T>(tokio::task::JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn run_entry(entry: PreparedEntry, deadline: Option<Instant>, spawn: bool) -> Outcome {
    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
        return Outcome::OutOfTime;
    }
    let (statement, slice) = match entry {
        Ok(entry) => entry,
        Err(e) => return Outcome::Failed(e),
    };

    let evaluated = if spawn {
        // Dropping the stream on an early return drops this guard too.
        let mut task = AbortOnDrop(tokio::spawn(async move { statement.evaluate(&slice).await }));
        match (&mut task.0).await {
            Ok(evaluated) => evaluated,
            Err(e) => Err(TermError::Internal(format!("statement task failed: {e}"))),
        }
    } else {
        statement.evaluate(&slice).await
    };

    match evaluated {
        Ok(report) => Outcome::Report(report),
        Err(e) => Outcome::Failed(e),
    }
}

/// Validates `table` against `document` with the built-in statements and
/// default settings.
pub async fn validate(table: &RecordBatch, document: &ValidationDocument) -> Result<ValidationReport> {
    let suite = ValidationSuite::builder(&document.name)
        .description_opt(document.description.clone())
        .build();
    suite.run_document(table, document).await
}

/// Builder for constructing `ValidationSuite` instances.
#[derive(Debug)]
pub struct ValidationSuiteBuilder {
    name: String,
    description: Option<String>,
    registry: Option<Arc<StatementRegistry>>,
    error_policy: ErrorPolicy,
    aggregation: AggregationRule,
    concurrency: usize,
    time_budget: Option<Duration>,
    log_config: LogConfig,
}

impl ValidationSuiteBuilder {
    /// Creates a new validation suite builder with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            registry: None,
            error_policy: ErrorPolicy::default(),
            aggregation: AggregationRule::default(),
            concurrency: 1,
            time_budget: None,
            log_config: LogConfig::default(),
        }
    }

    /// Sets the description for the validation suite.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn description_opt(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the statement registry. Defaults to the built-in statements.
    pub fn registry(mut self, registry: Arc<StatementRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the error policy.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Shorthand for [`ErrorPolicy::ContinueOnError`].
    pub fn continue_on_error(self) -> Self {
        self.error_policy(ErrorPolicy::ContinueOnError)
    }

    /// Sets the aggregation rule for the overall verdict.
    pub fn aggregation(mut self, rule: AggregationRule) -> Self {
        self.aggregation = rule;
        self
    }

    /// Evaluates up to `limit` entries at once on tokio tasks.
    ///
    /// A limit of 0 or 1 evaluates sequentially.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Evaluates entries concurrently, one per available CPU.
    pub fn parallel(self) -> Self {
        self.concurrency(num_cpus::get())
    }

    /// Sets a wall-clock budget for the evaluation phase.
    ///
    /// The budget is checked before each entry starts, never mid-entry.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Sets the logging configuration.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Builds the validation suite.
    pub fn build(self) -> ValidationSuite {
        ValidationSuite {
            name: self.name,
            description: self.description,
            registry: self
                .registry
                .unwrap_or_else(|| Arc::new(StatementRegistry::with_builtins())),
            error_policy: self.error_policy,
            aggregation: self.aggregation,
            concurrency: self.concurrency,
            time_budget: self.time_budget,
            log_config: self.log_config,
        }
    }
}
