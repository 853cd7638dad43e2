//! Prelude for commonly used types and traits in term-assay.

pub use crate::coercion::{
    CoercedTable, Coercer, CoercionMode, ColumnDescriptor, ColumnType, TypingOptions,
};
pub use crate::core::{
    AggregationRule, ErrorPolicy, Level, Location, StatementConfig, StatementRegistry,
    ValidationDocument, ValidationReport, ValidationSuite,
};
pub use crate::error::{ErrorContext, Result, TermError};
pub use crate::formatters::{FormatterConfig, ResultFormatter};
pub use crate::logging::LogConfig;
