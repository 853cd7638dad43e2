//! Statement configurations and option access.

use super::{Level, Location};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Option keys every statement accepts in addition to its own parameters.
pub const BASE_PARAMETERS: &[&str] = &["type", "severity", "location"];

/// The open option mapping of one statement configuration entry.
///
/// Holds every key of the entry, base keys (`type`, `severity`, `location`)
/// included. Typed getters return [`TermError::Configuration`] naming the
/// offending key when a value has the wrong shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementOptions(Map<String, Value>);

impl StatementOptions {
    /// Creates an empty option mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, returning the updated mapping.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Inserts an option.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the raw value of an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true if the option is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over option keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the options and returns the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Fails if any key is outside `expected` and [`BASE_PARAMETERS`].
    ///
    /// The error lists exactly the unrecognized keys, in the order they were
    /// supplied, together with every accepted key.
    pub fn ensure_expected(&self, statement: &str, expected: &[&str]) -> Result<()> {
        let accepted = |key: &str| expected.contains(&key) || BASE_PARAMETERS.contains(&key);
        let unexpected: Vec<String> = self
            .keys()
            .filter(|key| !accepted(key))
            .map(str::to_string)
            .collect();

        if unexpected.is_empty() {
            return Ok(());
        }
        Err(TermError::UnexpectedParameters {
            statement: statement.to_string(),
            unexpected,
            accepted: expected
                .iter()
                .chain(BASE_PARAMETERS)
                .map(|key| key.to_string())
                .collect(),
        })
    }

    /// Returns a required option.
    pub fn required(&self, key: &str) -> Result<&Value> {
        self.get(key)
            .ok_or_else(|| TermError::configuration(format!("missing required option '{key}'")))
    }

    /// Reads an optional number.
    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_f64().map(Some).ok_or_else(|| invalid(key, "a number", value)),
        }
    }

    /// Reads a number, falling back to `default`.
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.optional_f64(key)?.unwrap_or(default))
    }

    /// Reads an optional non-negative integer.
    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| invalid(key, "a non-negative integer", value)),
        }
    }

    /// Reads a percentage in `[0, 100]`, falling back to `default`.
    pub fn percent_or(&self, key: &str, default: f64) -> Result<f64> {
        let percent = self.f64_or(key, default)?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(TermError::configuration(format!(
                "option '{key}' must be between 0 and 100, got {percent}"
            )));
        }
        Ok(percent)
    }

    /// Reads a boolean, falling back to `default`.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value.as_bool().ok_or_else(|| invalid(key, "a boolean", value)),
        }
    }

    /// Reads an optional string.
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| invalid(key, "a string", value)),
        }
    }

    /// Reads a string or a list of strings as a list.
    pub fn optional_string_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(key, "a string or a list of strings", item))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(invalid(key, "a string or a list of strings", other)),
        }
    }

    /// Reads the statement's location.
    pub fn location(&self) -> Result<Location> {
        Location::from_value(self.required("location")?)
    }
}

fn invalid(key: &str, expected: &str, got: &Value) -> TermError {
    TermError::configuration(format!("option '{key}' must be {expected}, got {got}"))
}

impl From<Map<String, Value>> for StatementOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StatementOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One entry of a validation document.
///
/// Serialized as a flat object: `{"type": .., "severity": .., "location": ..,
/// ...options}`.
///
/// # Examples
///
/// ```rust
/// use term_assay::core::{Level, Location, StatementConfig};
///
/// let config = StatementConfig::new("not_null", Location::column("id"))
///     .with_severity(Level::Error)
///     .with_option("at_least_%", 95.0);
///
/// let json = serde_json::to_value(&config).unwrap();
/// assert_eq!(json["type"], "not_null");
/// assert_eq!(json["at_least_%"], 95.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementConfig {
    /// Registry identifier of the statement type
    #[serde(rename = "type")]
    pub statement_type: String,
    /// Severity label (default: warning)
    #[serde(default)]
    pub severity: Level,
    /// Statement scope
    pub location: Location,
    /// Statement-specific options
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl StatementConfig {
    /// Creates a configuration with default severity and no options.
    pub fn new(statement_type: impl Into<String>, location: Location) -> Self {
        Self {
            statement_type: statement_type.into(),
            severity: Level::default(),
            location,
            options: Map::new(),
        }
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Level) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a statement-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns the full option mapping, base keys included.
    pub fn statement_options(&self) -> StatementOptions {
        let mut map = Map::with_capacity(self.options.len() + BASE_PARAMETERS.len());
        map.insert("type".to_string(), Value::String(self.statement_type.clone()));
        map.insert("severity".to_string(), Value::String(self.severity.to_string()));
        map.insert("location".to_string(), Value::from(self.location.clone()));
        map.extend(self.options.iter().map(|(k, v)| (k.clone(), v.clone())));
        StatementOptions(map)
    }

    /// Builds a configuration from profiled options.
    ///
    /// Base keys present in `options` are ignored in favor of the arguments.
    pub fn from_profile(
        statement_type: impl Into<String>,
        location: Location,
        options: StatementOptions,
    ) -> Self {
        let mut config = Self::new(statement_type, location);
        config.options = options
            .into_map()
            .into_iter()
            .filter(|(k, _)| !BASE_PARAMETERS.contains(&k.as_str()))
            .collect();
        config
    }
}

/// A named, ordered list of statement configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDocument {
    /// Document name, used as the suite name of the report
    pub name: String,
    /// Free-form description, carried through unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Statement entries in evaluation order
    pub statements: Vec<StatementConfig>,
}

impl ValidationDocument {
    /// Creates an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            statements: Vec::new(),
        }
    }

    /// Appends a statement entry.
    pub fn with_statement(mut self, statement: StatementConfig) -> Self {
        self.statements.push(statement);
        self
    }

    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| TermError::configuration(format!("invalid validation document: {e}")))
    }

    /// Loads a document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).with_context(|| {
            format!("Failed to read validation document '{}'", path.display())
        })?;
        Self::from_json(&json)
    }

    /// Serializes the document to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> StatementOptions {
        match value {
            Value::Object(map) => StatementOptions::from(map),
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_ensure_expected_names_exactly_unknown_keys() {
        let opts = options(json!({
            "type": "not_null",
            "location": ["a"],
            "at_leat_%": 90,
            "at_most_%": 100,
            "bogus": true
        }));
        let err = opts
            .ensure_expected("not_null", &["at_least_%", "at_most_%"])
            .unwrap_err();
        match err {
            TermError::UnexpectedParameters {
                statement,
                unexpected,
                accepted,
            } => {
                assert_eq!(statement, "not_null");
                assert_eq!(unexpected, vec!["at_leat_%", "bogus"]);
                assert!(accepted.contains(&"at_least_%".to_string()));
                assert!(accepted.contains(&"severity".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_expected_accepts_base_keys() {
        let opts = options(json!({"type": "x", "severity": "info", "location": "table"}));
        assert!(opts.ensure_expected("x", &[]).is_ok());
    }

    #[test]
    fn test_typed_getters() {
        let opts = options(json!({
            "pct": 50,
            "flag": false,
            "name": "n",
            "one": "a",
            "many": ["a", "b"],
            "count": 3
        }));
        assert_eq!(opts.percent_or("pct", 100.0).unwrap(), 50.0);
        assert_eq!(opts.percent_or("missing", 100.0).unwrap(), 100.0);
        assert!(!opts.bool_or("flag", true).unwrap());
        assert_eq!(opts.optional_str("name").unwrap(), Some("n"));
        assert_eq!(opts.optional_string_list("one").unwrap(), Some(vec!["a".to_string()]));
        assert_eq!(opts.optional_string_list("many").unwrap().unwrap().len(), 2);
        assert_eq!(opts.optional_u64("count").unwrap(), Some(3));
    }

    #[test]
    fn test_typed_getters_reject_wrong_shapes() {
        let opts = options(json!({"pct": 150, "flag": "yes", "count": -1}));
        assert!(opts.percent_or("pct", 100.0).unwrap_err().is_configuration());
        assert!(opts.bool_or("flag", true).is_err());
        assert!(opts.optional_u64("count").is_err());
        assert!(opts.required("absent").is_err());
    }

    #[test]
    fn test_config_flattens_options() {
        let config: StatementConfig = serde_json::from_value(json!({
            "type": "unique",
            "location": ["id"],
            "at_least_%": 99.5
        }))
        .unwrap();
        assert_eq!(config.severity, Level::Warning);
        assert_eq!(config.location, Location::column("id"));

        let all = config.statement_options();
        let keys: Vec<&str> = all.keys().collect();
        assert_eq!(keys, vec!["type", "severity", "location", "at_least_%"]);
    }

    #[test]
    fn test_config_rejects_bad_location() {
        let result: std::result::Result<StatementConfig, _> = serde_json::from_value(json!({
            "type": "unique",
            "location": "id"
        }));
        assert!(result.is_err());

        let err = ValidationDocument::from_json(
            r#"{"name": "d", "statements": [{"type": "unique", "location": "id"}]}"#,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_document_structure_errors_are_configuration() {
        let bad_severity = ValidationDocument::from_json(
            r#"{"name": "d", "statements": [{"type": "unique", "severity": "fatal", "location": ["id"]}]}"#,
        );
        assert!(bad_severity.unwrap_err().is_configuration());

        let missing_type =
            ValidationDocument::from_json(r#"{"name": "d", "statements": [{"location": ["id"]}]}"#);
        assert!(missing_type.unwrap_err().is_configuration());
    }

    #[test]
    fn test_document_from_json() {
        let doc = ValidationDocument::from_json(
            r#"{
                "name": "orders",
                "statements": [
                    {"type": "row_count", "location": "table", "min": 1},
                    {"type": "not_null", "severity": "error", "location": ["id"]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.name, "orders");
        assert_eq!(doc.statements.len(), 2);
        assert_eq!(doc.statements[1].severity, Level::Error);
        assert_eq!(doc.statements[0].options["min"], json!(1));
    }
}
