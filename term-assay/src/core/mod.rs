//! Core validation types: statements, their configuration, the registry and
//! the orchestrator.

pub mod level;
pub mod location;
pub mod options;
pub mod registry;
pub mod result;
pub mod statement;
pub mod suite;

pub use level::Level;
pub use location::Location;
pub use options::{StatementConfig, StatementOptions, ValidationDocument, BASE_PARAMETERS};
pub use registry::{CollisionPolicy, StatementRegistry};
pub use result::{AggregationRule, EntryReport, ValidationMetrics, ValidationReport};
pub use statement::{check_scope, select_columns, Detail, Statement, StatementReport, StatementType};
pub use suite::{validate, ErrorPolicy, ValidationSuite, ValidationSuiteBuilder};
