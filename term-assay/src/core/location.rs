//! Statement scope: the whole table or an ordered list of columns.

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

const TABLE: &str = "table";

/// Where a statement applies.
///
/// Serialized as the string `"table"` or as a list of column names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum Location {
    /// The whole table
    #[default]
    Table,
    /// An ordered, non-empty list of column names
    Columns(Vec<String>),
}

impl Location {
    /// Creates a column location.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Location::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// Creates a single-column location.
    pub fn column(column: impl Into<String>) -> Self {
        Location::Columns(vec![column.into()])
    }

    /// Returns true for the whole-table scope.
    pub fn is_table(&self) -> bool {
        matches!(self, Location::Table)
    }

    /// Returns the column names, or `None` for the whole table.
    pub fn column_names(&self) -> Option<&[String]> {
        match self {
            Location::Table => None,
            Location::Columns(columns) => Some(columns),
        }
    }

    /// Parses a location from its JSON representation.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::String(s) if s == TABLE => Ok(Location::Table),
            Value::String(s) => Err(TermError::configuration(format!(
                "location must be \"table\" or a list of column names, got \"{s}\""
            ))),
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(TermError::configuration(
                        "location column list must not be empty",
                    ));
                }
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(name) if !name.is_empty() => Ok(name.clone()),
                        other => Err(TermError::configuration(format!(
                            "location columns must be non-empty strings, got {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Location::Columns)
            }
            other => Err(TermError::configuration(format!(
                "location must be \"table\" or a list of column names, got {other}"
            ))),
        }
    }
}

impl TryFrom<Value> for Location {
    type Error = TermError;

    fn try_from(value: Value) -> Result<Self> {
        Location::from_value(&value)
    }
}

impl From<Location> for Value {
    fn from(location: Location) -> Self {
        match location {
            Location::Table => Value::String(TABLE.to_string()),
            Location::Columns(columns) => {
                Value::Array(columns.into_iter().map(Value::String).collect())
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Table => write!(f, "{TABLE}"),
            Location::Columns(columns) => write!(f, "columns [{}]", columns.join(", ")),
        }
    }
}
