//! Error types for the Term assay library.
//!
//! All fallible operations return [`Result`], an alias over [`TermError`].
//! Configuration mistakes (unknown options, unknown statement types, missing
//! columns, scope mismatches) are surfaced eagerly with enough context to fix
//! the offending configuration. Data-quality symptoms such as unparsable
//! values are *not* errors; they are recorded as
//! [`IntegrityViolation`](crate::coercion::IntegrityViolation)s and in
//! statement reports.

use crate::coercion::IntegrityViolation;
use thiserror::Error;

/// The main error type for the Term assay library.
#[derive(Error, Debug)]
pub enum TermError {
    /// A statement or column descriptor received an invalid or missing option.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A statement received option keys it does not recognize.
    #[error(
        "Invalid parameters passed to '{statement}' statement: {unexpected:?}. \
         The valid parameters are: {accepted:?}"
    )]
    UnexpectedParameters {
        /// Identifier of the statement type being constructed
        statement: String,
        /// The unrecognized keys, in the order they were supplied
        unexpected: Vec<String>,
        /// Every key the statement type accepts
        accepted: Vec<String>,
    },

    /// A configuration entry references a statement type that is not registered.
    #[error("Unknown statement type '{identifier}'")]
    UnknownStatementType { identifier: String },

    /// A statement type is registered twice while the registry rejects collisions.
    #[error("Statement type '{identifier}' is already registered")]
    DuplicateStatementType { identifier: String },

    /// A required column is absent from the table.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// The requested location conflicts with the statement's declared scope.
    #[error("Statement '{statement}' cannot be applied to {requested}: {reason}")]
    ScopeMismatch {
        statement: String,
        requested: String,
        reason: String,
    },

    /// A configuration entry failed; wraps the underlying error with its position.
    #[error("Statement entry #{index} ('{statement_type}') failed: {source}")]
    Entry {
        /// Zero-based position of the entry in the supplied configuration
        index: usize,
        /// Statement type identifier of the entry
        statement_type: String,
        #[source]
        source: Box<TermError>,
    },

    /// Raised by strict coercion on the first integrity violation.
    #[error("Integrity violation: {0}")]
    Integrity(IntegrityViolation),

    /// The caller-imposed wall-clock budget ran out before an entry started.
    #[error("Validation time budget exceeded before entry #{index} ({completed} of {total} entries evaluated)")]
    DeadlineExceeded {
        index: usize,
        completed: usize,
        total: usize,
    },

    /// A finished validation run failed at or above the requested severity.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Human-readable error message
        message: String,
        /// Name of the suite that failed
        suite: String,
    },

    /// Error when an operation is not supported (e.g. profiling a statement type without a profiler).
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from DataFusion operations.
    #[error("DataFusion error: {0}")]
    DataFusion(#[from] datafusion::error::DataFusionError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Security-related error.
    #[error("Security error: {0}")]
    SecurityError(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, TermError>`.
///
/// This is the standard `Result` type used throughout the library.
pub type Result<T> = std::result::Result<T, TermError>;

impl TermError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new scope mismatch error.
    pub fn scope_mismatch(
        statement: impl Into<String>,
        requested: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ScopeMismatch {
            statement: statement.into(),
            requested: requested.into(),
            reason: reason.into(),
        }
    }

    /// Attributes this error to a configuration entry.
    pub fn for_entry(self, index: usize, statement_type: impl Into<String>) -> Self {
        Self::Entry {
            index,
            statement_type: statement_type.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping entry attribution.
    pub fn root(&self) -> &TermError {
        match self {
            TermError::Entry { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true for structural configuration mistakes.
    ///
    /// These are never retried and always carry the identifier, column or
    /// option names needed to fix the configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root(),
            TermError::Configuration(_)
                | TermError::UnexpectedParameters { .. }
                | TermError::UnknownStatementType { .. }
                | TermError::DuplicateStatementType { .. }
                | TermError::ColumnNotFound { .. }
                | TermError::ScopeMismatch { .. }
                | TermError::SecurityError(_)
        )
    }
}

impl From<serde_json::Error> for TermError {
    fn from(err: serde_json::Error) -> Self {
        TermError::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TermError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            TermError::Internal(inner) => TermError::Internal(format!("{msg}: {inner}")),
            other => TermError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                TermError::Internal(inner) => TermError::Internal(format!("{msg}: {inner}")),
                other => TermError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unexpected_parameters_message() {
        let err = TermError::UnexpectedParameters {
            statement: "not_null".to_string(),
            unexpected: vec!["at_leat_%".to_string()],
            accepted: vec!["at_least_%".to_string(), "type".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("not_null"));
        assert!(message.contains("at_leat_%"));
        assert!(message.contains("at_least_%"));
    }

    #[test]
    fn test_column_not_found() {
        let err = TermError::ColumnNotFound {
            column: "user_id".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'user_id' not found in dataset");
    }

    #[test]
    fn test_entry_attribution_keeps_source() {
        let err = TermError::UnknownStatementType {
            identifier: "nope".to_string(),
        }
        .for_entry(3, "nope");

        assert!(err.to_string().contains("#3"));
        assert!(err.source().is_some());
        assert!(matches!(
            err.root(),
            TermError::UnknownStatementType { identifier } if identifier == "nope"
        ));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_data_errors_are_not_configuration() {
        let err = TermError::Internal("boom".to_string());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(TermError::Internal("Something went wrong".to_string()))
        }

        let result = failing_operation().context("During coercion");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("During coercion"));
    }
}
