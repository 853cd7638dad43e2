//! Column type descriptors: per-column typing and parsing configuration.

use super::temporal;
use crate::prelude::*;
use arrow::datatypes::{DataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Tokens recognized as `true` when a boolean column declares no `truthies`.
pub const DEFAULT_TRUTHIES: &[&str] = &["true", "t", "yes", "y", "1"];
/// Tokens recognized as `false` when a boolean column declares no `falsies`.
pub const DEFAULT_FALSIES: &[&str] = &["false", "f", "no", "n", "0"];

/// The canonical column types a raw column can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit signed integer
    #[serde(alias = "integer", alias = "int")]
    Int64,
    /// 64-bit IEEE float
    #[serde(alias = "float")]
    Float64,
    /// UTF-8 text
    #[serde(alias = "str")]
    String,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time without time zone
    #[serde(alias = "timestamp")]
    DateTime,
    /// Boolean
    #[serde(alias = "bool")]
    Boolean,
}

impl ColumnType {
    /// Returns the string representation of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int64 => "int64",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::DateTime => "datetime",
            ColumnType::Boolean => "boolean",
        }
    }

    /// The Arrow data type used for columns of this type.
    pub fn arrow_type(&self) -> DataType {
        match self {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::String => DataType::Utf8,
            ColumnType::Date => DataType::Date32,
            ColumnType::Time => DataType::Time64(TimeUnit::Microsecond),
            ColumnType::DateTime => DataType::Timestamp(TimeUnit::Microsecond, None),
            ColumnType::Boolean => DataType::Boolean,
        }
    }

    /// Whether values of this type are parsed with separator hints.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Int64 | ColumnType::Float64)
    }

    /// Whether values of this type are parsed with a format pattern.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Time | ColumnType::DateTime)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares how one raw text column is typed.
///
/// Nulls are disallowed and duplicates allowed unless stated otherwise.
/// Unknown fields are rejected when deserializing, and [`validate`](Self::validate)
/// rejects hints that do not apply to the declared type.
///
/// # Examples
///
/// ```rust
/// use term_assay::coercion::{ColumnDescriptor, ColumnType};
///
/// let amount = ColumnDescriptor::new(ColumnType::Float64)
///     .with_thousands_sep('.')
///     .with_decimal_sep(',');
/// assert!(amount.validate().is_ok());
///
/// let from_json: ColumnDescriptor =
///     serde_json::from_str(r#"{"type": "int64", "nullable": true, "thousands_sep": "."}"#).unwrap();
/// assert!(from_json.nullable);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDescriptor {
    /// Canonical type of the column
    #[serde(rename = "type", alias = "dtype")]
    pub column_type: ColumnType,
    /// Whether null values are permitted
    #[serde(default)]
    pub nullable: bool,
    /// Whether repeated non-null values are disallowed
    #[serde(default)]
    pub unique: bool,
    /// Thousands separator stripped before numeric parsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thousands_sep: Option<char>,
    /// Decimal separator replaced by `.` before float parsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_sep: Option<char>,
    /// strftime-style pattern for date, time and datetime columns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Tokens accepted as `true` (boolean columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truthies: Option<Vec<String>>,
    /// Tokens accepted as `false` (boolean columns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub falsies: Option<Vec<String>>,
}

impl ColumnDescriptor {
    /// Creates a descriptor with default flags and no parsing hints.
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            nullable: false,
            unique: false,
            thousands_sep: None,
            decimal_sep: None,
            format: None,
            truthies: None,
            falsies: None,
        }
    }

    /// Permits or forbids nulls.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Requires or relaxes uniqueness of non-null values.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets the thousands separator.
    pub fn with_thousands_sep(mut self, sep: char) -> Self {
        self.thousands_sep = Some(sep);
        self
    }

    /// Sets the decimal separator.
    pub fn with_decimal_sep(mut self, sep: char) -> Self {
        self.decimal_sep = Some(sep);
        self
    }

    /// Sets the date/time format pattern.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the boolean token sets.
    pub fn with_boolean_tokens<I, J, S, T>(mut self, truthies: I, falsies: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.truthies = Some(truthies.into_iter().map(Into::into).collect());
        self.falsies = Some(falsies.into_iter().map(Into::into).collect());
        self
    }

    /// The effective format pattern, falling back to the type default.
    pub fn format_pattern(&self) -> &str {
        if let Some(format) = &self.format {
            return format;
        }
        match self.column_type {
            ColumnType::Time => temporal::DEFAULT_TIME_FORMAT,
            ColumnType::DateTime => temporal::DEFAULT_DATETIME_FORMAT,
            _ => temporal::DEFAULT_DATE_FORMAT,
        }
    }

    /// Interprets a trimmed token as a boolean using the effective token sets.
    pub fn parse_boolean(&self, token: &str) -> Option<bool> {
        let contains = |custom: &Option<Vec<String>>, defaults: &[&str]| match custom {
            Some(tokens) => tokens.iter().any(|t| t.eq_ignore_ascii_case(token)),
            None => defaults.iter().any(|t| t.eq_ignore_ascii_case(token)),
        };
        if contains(&self.truthies, DEFAULT_TRUTHIES) {
            Some(true)
        } else if contains(&self.falsies, DEFAULT_FALSIES) {
            Some(false)
        } else {
            None
        }
    }

    /// The token written back for a boolean value.
    pub fn boolean_token(&self, value: bool) -> &str {
        let (custom, default) = if value {
            (&self.truthies, "true")
        } else {
            (&self.falsies, "false")
        };
        custom
            .as_ref()
            .and_then(|tokens| tokens.first())
            .map(String::as_str)
            .unwrap_or(default)
    }

    /// Checks that every declared hint applies to the declared type.
    pub fn validate(&self) -> Result<()> {
        let ty = self.column_type;

        if self.thousands_sep.is_some() && !ty.is_numeric() {
            return Err(TermError::configuration(format!(
                "'thousands_sep' is not accepted for {ty} columns"
            )));
        }
        if self.decimal_sep.is_some() && ty != ColumnType::Float64 {
            return Err(TermError::configuration(format!(
                "'decimal_sep' is not accepted for {ty} columns"
            )));
        }
        if self.format.is_some() && !ty.is_temporal() {
            return Err(TermError::configuration(format!(
                "'format' is not accepted for {ty} columns"
            )));
        }
        if (self.truthies.is_some() || self.falsies.is_some()) && ty != ColumnType::Boolean {
            return Err(TermError::configuration(format!(
                "'truthies'/'falsies' are not accepted for {ty} columns"
            )));
        }

        for (name, sep) in [
            ("thousands_sep", self.thousands_sep),
            ("decimal_sep", self.decimal_sep),
        ] {
            if let Some(sep) = sep {
                if sep.is_ascii_digit() || sep == '-' || sep == '+' {
                    return Err(TermError::configuration(format!(
                        "'{name}' cannot be '{sep}'"
                    )));
                }
            }
        }

        if let (Some(thousands), Some(decimal)) = (self.thousands_sep, self.decimal_sep) {
            if thousands == decimal {
                return Err(TermError::configuration(format!(
                    "'thousands_sep' and 'decimal_sep' must differ (both are '{thousands}')"
                )));
            }
        }

        if let Some(format) = &self.format {
            if !temporal::is_valid_pattern(format) {
                return Err(TermError::configuration(format!(
                    "invalid format pattern '{format}'"
                )));
            }
        }

        if let (Some(truthies), Some(falsies)) = (&self.truthies, &self.falsies) {
            if let Some(shared) = truthies
                .iter()
                .find(|t| falsies.iter().any(|f| f.eq_ignore_ascii_case(t)))
            {
                return Err(TermError::configuration(format!(
                    "boolean token '{shared}' is both truthy and falsy"
                )));
            }
        }
        for tokens in [&self.truthies, &self.falsies].into_iter().flatten() {
            if tokens.is_empty() {
                return Err(TermError::configuration(
                    "'truthies' and 'falsies' cannot be empty",
                ));
            }
        }

        Ok(())
    }
}

/// Column typing options: a mapping from column name to descriptor.
///
/// Columns present in the raw table but absent here are passed through as
/// raw text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypingOptions {
    columns: BTreeMap<String, ColumnDescriptor>,
}

impl TypingOptions {
    /// Creates empty typing options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column descriptor.
    pub fn with_column(mut self, name: impl Into<String>, descriptor: ColumnDescriptor) -> Self {
        self.columns.insert(name.into(), descriptor);
        self
    }

    /// Inserts a column descriptor, returning the previous one if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        descriptor: ColumnDescriptor,
    ) -> Option<ColumnDescriptor> {
        self.columns.insert(name.into(), descriptor)
    }

    /// Returns the descriptor for a column.
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(name)
    }

    /// Iterates over declared columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnDescriptor)> {
        self.columns.iter().map(|(name, d)| (name.as_str(), d))
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if no column is declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Validates every descriptor, naming the offending column on failure.
    pub fn validate(&self) -> Result<()> {
        for (name, descriptor) in &self.columns {
            descriptor.validate().map_err(|e| match e {
                TermError::Configuration(message) => {
                    TermError::Configuration(format!("column '{name}': {message}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Parses and validates typing options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| TermError::configuration(format!("invalid typing options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Reads typing options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl FromIterator<(String, ColumnDescriptor)> for TypingOptions {
    fn from_iter<I: IntoIterator<Item = (String, ColumnDescriptor)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
