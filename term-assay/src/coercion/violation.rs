//! Integrity violations recorded while coercing raw columns.

use super::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of data-quality defect found in a single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// The raw text could not be parsed as the declared type; the cell is null.
    ParseFailure {
        /// The offending raw text (trimmed)
        value: String,
        /// The declared column type
        expected: ColumnType,
    },
    /// A null value in a column declared non-nullable.
    NullNotAllowed,
    /// A repeated value in a column declared unique.
    Duplicate {
        /// Row of the first occurrence of the value
        first_row: usize,
    },
}

/// A data-quality defect located at one cell of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityViolation {
    /// Column the violation was found in
    pub column: String,
    /// Zero-based row index
    pub row: usize,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl IntegrityViolation {
    pub(crate) fn parse_failure(
        column: &str,
        row: usize,
        value: impl Into<String>,
        expected: ColumnType,
    ) -> Self {
        Self {
            column: column.to_string(),
            row,
            kind: ViolationKind::ParseFailure {
                value: value.into(),
                expected,
            },
        }
    }

    pub(crate) fn null_not_allowed(column: &str, row: usize) -> Self {
        Self {
            column: column.to_string(),
            row,
            kind: ViolationKind::NullNotAllowed,
        }
    }

    pub(crate) fn duplicate(column: &str, row: usize, first_row: usize) -> Self {
        Self {
            column: column.to_string(),
            row,
            kind: ViolationKind::Duplicate { first_row },
        }
    }

    /// Returns true if this violation is a parse failure.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self.kind, ViolationKind::ParseFailure { .. })
    }
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = &self.column;
        let row = self.row;
        match &self.kind {
            ViolationKind::ParseFailure { value, expected } => write!(
                f,
                "column '{column}' row {row}: cannot parse '{value}' as {expected}"
            ),
            ViolationKind::NullNotAllowed => {
                write!(f, "column '{column}' row {row}: null value in non-nullable column")
            }
            ViolationKind::Duplicate { first_row } => write!(
                f,
                "column '{column}' row {row}: duplicate of row {first_row} in unique column"
            ),
        }
    }
}
