//! The `contain` statement.

use super::{percent, tuple_to_json, value_keys, ValueKey};
use crate::core::{Detail, Statement, StatementOptions, StatementType};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// Largest number of distinct values `contain` profiling accepts.
pub const PROFILE_DISTINCT_LIMIT: usize = 20;

/// Which side of the value check a `contain` statement enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainRule {
    /// Every listed value occurs between the occurrence bounds
    All,
    /// No other value occurs, up to the tolerance
    Only,
    /// Both of the above
    AllAndOnly,
}

impl ContainRule {
    /// Returns the rule's name as written in validation documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainRule::All => "all",
            ContainRule::Only => "only",
            ContainRule::AllAndOnly => "all_and_only",
        }
    }

    fn checks_presence(&self) -> bool {
        matches!(self, ContainRule::All | ContainRule::AllAndOnly)
    }

    fn checks_exclusivity(&self) -> bool {
        matches!(self, ContainRule::Only | ContainRule::AllAndOnly)
    }
}

impl FromStr for ContainRule {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(ContainRule::All),
            "only" => Ok(ContainRule::Only),
            "all_and_only" => Ok(ContainRule::AllAndOnly),
            other => Err(TermError::configuration(format!(
                "rule must be 'all', 'only' or 'all_and_only', got '{other}'"
            ))),
        }
    }
}

/// Checks the presence and exclusivity of a list of values in the scoped
/// columns.
///
/// With one scoped column `values` lists scalars; with several it lists
/// value tuples as lists in column order. Rows with a null in any scoped
/// column are excluded from the check.
///
/// Options: `rule` (required), `values` (required), `min_occurrences`
/// (default 1), `max_occurrences`, `tolerance_%` (default 0) and `verbose`
/// (default true).
#[derive(Debug, Clone, Copy, Default)]
pub struct Contain;

#[derive(Debug)]
struct ContainStatement {
    rule: ContainRule,
    values: Vec<Vec<ValueKey>>,
    min_occurrences: u64,
    max_occurrences: Option<u64>,
    tolerance: f64,
    verbose: bool,
}

fn parse_values(values: &Value) -> Result<Vec<Vec<ValueKey>>> {
    let Value::Array(items) = values else {
        return Err(TermError::configuration(format!(
            "values must be a list, got {values}"
        )));
    };
    if items.is_empty() {
        return Err(TermError::configuration("values must not be empty"));
    }

    let tuples = items
        .iter()
        .map(|item| -> Result<Vec<ValueKey>> {
            match item {
            Value::Array(tuple) => tuple.iter().map(ValueKey::from_json).collect(),
            scalar => Ok(vec![ValueKey::from_json(scalar)?]),
            }
        })
        .collect::<Result<Vec<Vec<ValueKey>>>>()?;

    let arity = tuples[0].len();
    if arity == 0 || tuples.iter().any(|t| t.len() != arity) {
        return Err(TermError::configuration(
            "values must all have the same, non-zero number of columns",
        ));
    }
    Ok(tuples)
}

impl StatementType for Contain {
    fn name(&self) -> &str {
        "contain"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &[
            "rule",
            "values",
            "min_occurrences",
            "max_occurrences",
            "tolerance_%",
            "verbose",
        ]
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        let rule = options
            .optional_str("rule")?
            .ok_or_else(|| TermError::configuration("missing required option 'rule'"))?
            .parse::<ContainRule>()?;
        let values = parse_values(options.required("values")?)?;
        if options.get("location").is_some() {
            if let Location::Columns(columns) = options.location()? {
                let arity = values[0].len();
                if arity != columns.len() {
                    return Err(TermError::configuration(format!(
                        "values have {arity} column(s) but the statement is scoped to {}",
                        columns.len()
                    )));
                }
            }
        }
        let min_occurrences = options.optional_u64("min_occurrences")?.unwrap_or(1);
        let max_occurrences = options.optional_u64("max_occurrences")?;
        if let Some(max) = max_occurrences {
            if min_occurrences > max {
                return Err(TermError::configuration(format!(
                    "min_occurrences ({min_occurrences}) must not exceed max_occurrences ({max})"
                )));
            }
        }

        Ok(Box::new(ContainStatement {
            rule,
            values,
            min_occurrences,
            max_occurrences,
            tolerance: options.percent_or("tolerance_%", 0.0)?,
            verbose: options.bool_or("verbose", true)?,
        }))
    }

    fn profile(&self, sample: &RecordBatch) -> Result<StatementOptions> {
        let mut distinct: Vec<Vec<ValueKey>> = Vec::new();
        for tuple in value_keys(sample)? {
            if tuple.contains(&ValueKey::Null) || distinct.contains(&tuple) {
                continue;
            }
            if distinct.len() == PROFILE_DISTINCT_LIMIT {
                return Err(TermError::NotSupported(format!(
                    "contain profiling is limited to {PROFILE_DISTINCT_LIMIT} distinct values"
                )));
            }
            distinct.push(tuple);
        }
        if distinct.is_empty() {
            return Err(TermError::NotSupported(
                "contain profiling needs at least one non-null value".to_string(),
            ));
        }

        Ok(StatementOptions::new()
            .with("rule", ContainRule::AllAndOnly.as_str())
            .with(
                "values",
                Value::Array(distinct.iter().map(|t| tuple_to_json(t)).collect()),
            ))
    }
}

impl ContainStatement {
    fn occurrence_ok(&self, count: u64) -> bool {
        count >= self.min_occurrences && self.max_occurrences.map_or(true, |max| count <= max)
    }
}

#[async_trait]
impl Statement for ContainStatement {
    fn name(&self) -> &str {
        "contain"
    }

    async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
        let arity = self.values.first().map_or(0, Vec::len);
        if slice.num_columns() != arity {
            return Err(TermError::configuration(format!(
                "values have {arity} column(s) but the statement is scoped to {}",
                slice.num_columns()
            )));
        }

        let mut counts: HashMap<&[ValueKey], u64> =
            self.values.iter().map(|v| (v.as_slice(), 0)).collect();
        let mut null_rows = 0usize;
        let mut unexpected_rows = 0usize;
        let mut unexpected_values: Vec<Vec<ValueKey>> = Vec::new();

        let tuples = value_keys(slice)?;
        for tuple in &tuples {
            if tuple.contains(&ValueKey::Null) {
                null_rows += 1;
                continue;
            }
            match counts.get_mut(tuple.as_slice()) {
                Some(count) => *count += 1,
                None => {
                    unexpected_rows += 1;
                    if self.verbose && !unexpected_values.contains(tuple) {
                        unexpected_values.push(tuple.clone());
                    }
                }
            }
        }

        let checked_rows = tuples.len() - null_rows;
        let value_count: Vec<Value> = self
            .values
            .iter()
            .map(|v| {
                let mut entry = Map::new();
                entry.insert("value".to_string(), tuple_to_json(v));
                entry.insert("count".to_string(), Value::from(counts[v.as_slice()]));
                Value::Object(entry)
            })
            .collect();
        let missing_values: Vec<Value> = self
            .values
            .iter()
            .filter(|v| !self.occurrence_ok(counts[v.as_slice()]))
            .map(|v| tuple_to_json(v))
            .collect();

        let mut detail = Detail::new();
        detail.insert("rows".to_string(), Value::from(tuples.len()));
        detail.insert("null_rows".to_string(), Value::from(null_rows));
        detail.insert("value_count".to_string(), Value::Array(value_count));
        detail.insert("missing_values".to_string(), Value::Array(missing_values));
        detail.insert("unexpected_rows".to_string(), Value::from(unexpected_rows));
        detail.insert(
            "unexpected_rows_%".to_string(),
            Value::from(100.0 - percent(checked_rows - unexpected_rows, checked_rows)),
        );
        if self.verbose {
            detail.insert(
                "unexpected_values".to_string(),
                Value::Array(unexpected_values.iter().map(|t| tuple_to_json(t)).collect()),
            );
        }
        Ok(detail)
    }

    fn result(&self, detail: &Detail) -> bool {
        let presence = || {
            detail
                .get("missing_values")
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty)
        };
        let exclusivity = || {
            detail
                .get("unexpected_rows_%")
                .and_then(Value::as_f64)
                .is_some_and(|pct| pct <= self.tolerance)
        };
        (!self.rule.checks_presence() || presence())
            && (!self.rule.checks_exclusivity() || exclusivity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::raw_table;
    use serde_json::json;

    fn statuses() -> RecordBatch {
        raw_table(vec![(
            "status",
            vec![
                Some("new"),
                Some("paid"),
                Some("paid"),
                Some("refunded"),
                None,
            ],
        )])
    }

    fn options(rule: &str, values: Value) -> StatementOptions {
        StatementOptions::new().with("rule", rule).with("values", values)
    }

    #[tokio::test]
    async fn test_all_rule() {
        let statement = Contain
            .construct(&options("all", json!(["new", "paid", "shipped"])))
            .unwrap();
        let report = statement.evaluate(&statuses()).await.unwrap();
        assert_eq!(report.detail["missing_values"], json!(["shipped"]));
        assert_eq!(report.detail["null_rows"], 1);
        assert!(!report.result);
    }

    #[tokio::test]
    async fn test_only_rule_with_tolerance() {
        let strict = Contain
            .construct(&options("only", json!(["new", "paid"])))
            .unwrap();
        let report = strict.evaluate(&statuses()).await.unwrap();
        assert_eq!(report.detail["unexpected_rows"], 1);
        assert_eq!(report.detail["unexpected_rows_%"], 25.0);
        assert_eq!(report.detail["unexpected_values"], json!(["refunded"]));
        assert!(!report.result);

        let tolerant = Contain
            .construct(&options("only", json!(["new", "paid"])).with("tolerance_%", 25))
            .unwrap();
        assert!(tolerant.evaluate(&statuses()).await.unwrap().result);
    }

    #[tokio::test]
    async fn test_occurrence_bounds() {
        let statement = Contain
            .construct(
                &options("all_and_only", json!(["new", "paid", "refunded"]))
                    .with("max_occurrences", 1),
            )
            .unwrap();
        let report = statement.evaluate(&statuses()).await.unwrap();
        assert_eq!(report.detail["missing_values"], json!(["paid"]));
        assert!(!report.result);
    }

    #[tokio::test]
    async fn test_multi_column_values() {
        let table = raw_table(vec![
            ("country", vec![Some("BR"), Some("US")]),
            ("currency", vec![Some("BRL"), Some("USD")]),
        ]);
        let statement = Contain
            .construct(&options("all_and_only", json!([["BR", "BRL"], ["US", "USD"]])))
            .unwrap();
        assert!(statement.evaluate(&table).await.unwrap().result);

        let wrong_arity = Contain.construct(&options("all", json!(["BR"]))).unwrap();
        assert!(wrong_arity.evaluate(&table).await.is_err());
    }

    #[test]
    fn test_arity_checked_against_location_at_construction() {
        let mismatched = options("all", json!(["x", "y"])).with("location", json!(["a", "b"]));
        assert!(Contain.construct(&mismatched).unwrap_err().is_configuration());

        let matched =
            options("all", json!([["x", "y"]])).with("location", json!(["a", "b"]));
        assert!(Contain.construct(&matched).is_ok());

        let table_scoped = options("all", json!(["x"])).with("location", "table");
        assert!(Contain.construct(&table_scoped).is_ok());
    }

    #[tokio::test]
    async fn test_non_verbose_omits_values() {
        let statement = Contain
            .construct(&options("only", json!(["new"])).with("verbose", false))
            .unwrap();
        let report = statement.evaluate(&statuses()).await.unwrap();
        assert!(!report.detail.contains_key("unexpected_values"));
    }

    #[test]
    fn test_invalid_options() {
        assert!(Contain.construct(&options("some", json!(["a"]))).is_err());
        assert!(Contain.construct(&options("all", json!([]))).is_err());
        assert!(Contain.construct(&options("all", json!("a"))).is_err());
        assert!(Contain
            .construct(&options("all", json!([["a"], ["b", "c"]])))
            .is_err());
        assert!(Contain
            .construct(&StatementOptions::new().with("values", json!(["a"])))
            .unwrap_err()
            .is_configuration());
    }

    #[tokio::test]
    async fn test_profile() {
        let sample = statuses();
        let profiled = Contain.profile(&sample).unwrap();
        assert_eq!(profiled.get("rule"), Some(&json!("all_and_only")));
        assert_eq!(profiled.get("values"), Some(&json!(["new", "paid", "refunded"])));
        let statement = Contain.construct(&profiled).unwrap();
        assert!(statement.evaluate(&sample).await.unwrap().result);

        let many: Vec<String> = (0..=PROFILE_DISTINCT_LIMIT).map(|i| i.to_string()).collect();
        let wide = raw_table(vec![("v", many.iter().map(|s| Some(s.as_str())).collect())]);
        assert!(matches!(
            Contain.profile(&wide).unwrap_err(),
            TermError::NotSupported(_)
        ));
    }
}
