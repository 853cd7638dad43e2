//! # Term Assay - Declarative Data Quality for Rust
//!
//! Term Assay checks tabular data against declarative validation
//! configurations. Tables are Apache Arrow `RecordBatch` values; raw text
//! columns are first coerced into typed columns, then a list of statements
//! (`not_null`, `unique`, `row_count`, `contain`, `column_expression`, or your
//! own) is evaluated and aggregated into a [`core::ValidationReport`].
//!
//! ## Quick Start
//!
//! ```rust
//! use arrow::array::StringArray;
//! use arrow::record_batch::RecordBatch;
//! use std::sync::Arc;
//! use term_assay::prelude::*;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let raw = RecordBatch::try_from_iter(vec![
//!     ("id", Arc::new(StringArray::from(vec!["1", "2", "3"])) as _),
//!     ("price", Arc::new(StringArray::from(vec!["1,50", "2,00", ""])) as _),
//! ])
//! .unwrap();
//!
//! let typing = TypingOptions::new()
//!     .with_column("id", ColumnDescriptor::new(ColumnType::Int64).with_unique(true))
//!     .with_column(
//!         "price",
//!         ColumnDescriptor::new(ColumnType::Float64)
//!             .with_nullable(true)
//!             .with_decimal_sep(','),
//!     );
//!
//! let statements = vec![
//!     StatementConfig::new("not_null", Location::column("price"))
//!         .with_severity(Level::Error)
//!         .with_option("at_least_%", 60),
//!     StatementConfig::new("row_count", Location::Table).with_option("min", 1),
//! ];
//!
//! let suite = ValidationSuite::builder("prices").build();
//! let (report, coerced) = suite.run_raw(&raw, &typing, &statements).await.unwrap();
//!
//! assert!(coerced.is_clean());
//! assert!(report.passed);
//! # })
//! ```
//!
//! ## Architecture
//!
//! - **`coercion`**: column descriptors and the raw-to-typed table coercion,
//!   recording integrity violations (parse failures, nulls, duplicates)
//! - **`sources`**: reading delimited text files into raw tables
//! - **`core`**: statement configurations, the `Statement`/`StatementType`
//!   traits, the statement registry, the validation suite and its report
//! - **`statements`**: the built-in statement types
//! - **`profiling`**: synthesizing a starter validation document from a sample
//! - **`formatters`**: report rendering (JSON, text, Markdown)
//! - **`logging`** and **`security`**: structured logging helpers and SQL
//!   expression screening

pub mod coercion;
pub mod core;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod prelude;
pub mod profiling;
pub mod security;
pub mod sources;
pub mod statements;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;
