//! Table profiling.
//!
//! [`Profiler`] builds a starter [`ValidationDocument`] from a sample table by
//! asking each configured statement type to profile every column, plus a
//! table-level `row_count`. Types that cannot profile a given column (such as
//! `contain` on a high-cardinality column) are skipped.
//!
//! # Example
//!
//! ```rust
//! use arrow::array::StringArray;
//! use arrow::record_batch::RecordBatch;
//! use std::sync::Arc;
//! use term_assay::profiling::Profiler;
//!
//! let sample = RecordBatch::try_from_iter(vec![(
//!     "status",
//!     Arc::new(StringArray::from(vec!["new", "paid", "paid"])) as _,
//! )])
//! .unwrap();
//! let document = Profiler::new("orders").profile(&sample).unwrap();
//! assert_eq!(document.statements.len(), 4);
//! ```

use crate::core::{StatementConfig, StatementRegistry, ValidationDocument};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Column statement types profiled by default, in document order.
pub const DEFAULT_COLUMN_STATEMENTS: &[&str] = &["not_null", "unique", "contain"];

/// Table statement types profiled by default.
pub const DEFAULT_TABLE_STATEMENTS: &[&str] = &["row_count"];

/// Synthesizes statement configurations from a sample.
#[derive(Debug, Clone)]
pub struct Profiler {
    name: String,
    registry: Arc<StatementRegistry>,
    column_statements: Vec<String>,
    table_statements: Vec<String>,
}

impl Profiler {
    /// Creates a profiler over the built-in statement types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: Arc::new(StatementRegistry::with_builtins()),
            column_statements: DEFAULT_COLUMN_STATEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            table_statements: DEFAULT_TABLE_STATEMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Resolves statement types from `registry` instead of the built-ins.
    pub fn with_registry(mut self, registry: Arc<StatementRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the statement types profiled per column.
    pub fn with_column_statements<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_statements = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the statement types profiled on the whole table.
    pub fn with_table_statements<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_statements = identifiers.into_iter().map(Into::into).collect();
        self
    }

    /// Profiles `sample` into a validation document.
    ///
    /// Column statements come first, grouped by column in schema order, then
    /// the table statements. Unknown identifiers fail the whole call; a
    /// `NotSupported` answer only skips that statement.
    #[instrument(skip(self, sample), fields(
        profile.name = %self.name,
        sample.rows = sample.num_rows(),
        sample.columns = sample.num_columns()
    ))]
    pub fn profile(&self, sample: &RecordBatch) -> Result<ValidationDocument> {
        for identifier in self.column_statements.iter().chain(&self.table_statements) {
            self.registry.resolve(identifier)?;
        }

        let mut document = ValidationDocument::new(self.name.clone());
        let schema = sample.schema();
        for (index, field) in schema.fields().iter().enumerate() {
            let slice = sample.project(&[index])?;
            for identifier in &self.column_statements {
                if let Some(config) = self.profile_one(identifier, &slice, field.name())? {
                    document = document.with_statement(config);
                }
            }
        }
        for identifier in &self.table_statements {
            if let Some(config) = self.profile_one(identifier, sample, "table")? {
                document = document.with_statement(config);
            }
        }

        info!(
            profile.name = %self.name,
            profile.statements = document.statements.len(),
            "Profiling completed"
        );
        Ok(document)
    }

    fn profile_one(
        &self,
        identifier: &str,
        sample: &RecordBatch,
        scope: &str,
    ) -> Result<Option<StatementConfig>> {
        match self.registry.profile(identifier, sample) {
            Ok(config) => Ok(Some(config)),
            Err(TermError::NotSupported(reason)) => {
                debug!(
                    statement.type = %identifier,
                    profile.scope = %scope,
                    reason = %reason,
                    "Skipping statement"
                );
                Ok(None)
            }
            Err(TermError::ScopeMismatch { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
