//! The statement contract: option validation, scope, report and verdict.

use super::{Location, StatementOptions};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;

/// Statement-specific metrics backing a verdict.
pub type Detail = Map<String, Value>;

/// The output of evaluating a statement: its metrics and the verdict derived
/// from them.
///
/// Serializes to an object with exactly two keys, `detail` and `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementReport {
    /// Statement-specific metrics
    pub detail: Detail,
    /// Whether the statement was fulfilled
    pub result: bool,
}

impl StatementReport {
    /// Creates a report.
    pub fn new(detail: Detail, result: bool) -> Self {
        Self { detail, result }
    }

    /// Report recorded for an entry that failed while running in
    /// continue-on-error mode.
    pub fn from_error(error: &TermError) -> Self {
        let mut detail = Detail::new();
        detail.insert("error".to_string(), Value::String(error.to_string()));
        Self {
            detail,
            result: false,
        }
    }

    /// Returns true if this report was recorded for a failed entry.
    pub fn is_error(&self) -> bool {
        self.detail.contains_key("error") && !self.result
    }
}

/// A constructed, ready-to-evaluate assertion.
///
/// Statements are built by a [`StatementType`] from validated options and are
/// evaluated against a slice of the table restricted to their scope.
///
/// # Examples
///
/// ```rust
/// use arrow::record_batch::RecordBatch;
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use term_assay::core::{Detail, Statement};
/// use term_assay::prelude::*;
///
/// #[derive(Debug)]
/// struct HasRows;
///
/// #[async_trait]
/// impl Statement for HasRows {
///     fn name(&self) -> &str {
///         "has_rows"
///     }
///
///     async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
///         let mut detail = Detail::new();
///         detail.insert("rows".to_string(), Value::from(slice.num_rows()));
///         Ok(detail)
///     }
///
///     fn result(&self, detail: &Detail) -> bool {
///         detail.get("rows").and_then(Value::as_u64).unwrap_or(0) > 0
///     }
/// }
/// ```
#[async_trait]
pub trait Statement: Debug + Send + Sync {
    /// Returns the identifier of the statement type.
    fn name(&self) -> &str;

    /// Computes statement-specific metrics over the scoped slice.
    async fn report(&self, slice: &RecordBatch) -> Result<Detail>;

    /// Derives the verdict. Reads only `detail` and the statement's options.
    fn result(&self, detail: &Detail) -> bool;

    /// Computes the report, then the verdict from it.
    async fn evaluate(&self, slice: &RecordBatch) -> Result<StatementReport> {
        let detail = self.report(slice).await?;
        let result = self.result(&detail);
        Ok(StatementReport { detail, result })
    }
}

/// A factory for statements, registered under an identifier.
///
/// Implementors declare their parameters and scope and build statements from
/// already key-checked options. [`construct`](StatementType::construct) runs
/// the key check so implementations never see unknown keys.
pub trait StatementType: Debug + Send + Sync {
    /// Returns the identifier used in statement configurations.
    fn name(&self) -> &str;

    /// Option keys this type accepts beyond `type`, `severity` and `location`.
    fn expected_parameters(&self) -> &[&'static str];

    /// Whether the type applies only to the whole table.
    fn table_only(&self) -> bool {
        false
    }

    /// Builds a statement from options whose keys have been checked.
    ///
    /// Performs statement-specific semantic validation.
    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>>;

    /// Validates option keys, then builds the statement.
    fn construct(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        options.ensure_expected(self.name(), self.expected_parameters())?;
        self.build(options)
    }

    /// Synthesizes options from a sample slice.
    ///
    /// The returned options never contain `type`, `severity` or `location`.
    fn profile(&self, _sample: &RecordBatch) -> Result<StatementOptions> {
        Err(TermError::NotSupported(format!(
            "statement type '{}' does not support profiling",
            self.name()
        )))
    }
}

/// Checks that `location` matches the declared scope of `statement_type`.
pub fn check_scope(statement_type: &dyn StatementType, location: &Location) -> Result<()> {
    match (statement_type.table_only(), location) {
        (true, Location::Columns(_)) => Err(TermError::scope_mismatch(
            statement_type.name(),
            location.to_string(),
            "statement applies only to the whole table",
        )),
        (false, Location::Table) => Err(TermError::scope_mismatch(
            statement_type.name(),
            location.to_string(),
            "statement requires a list of columns",
        )),
        (_, Location::Columns(columns)) if columns.is_empty() => Err(
            TermError::configuration("location column list must not be empty"),
        ),
        _ => Ok(()),
    }
}

/// Restricts `table` to the columns named by `location`, in that order.
///
/// A whole-table location returns the table unchanged.
pub fn select_columns(table: &RecordBatch, location: &Location) -> Result<RecordBatch> {
    let Some(columns) = location.column_names() else {
        return Ok(table.clone());
    };
    let schema = table.schema();
    let indices = columns
        .iter()
        .map(|column| {
            schema
                .index_of(column)
                .map_err(|_| TermError::ColumnNotFound {
                    column: column.clone(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(table.project(&indices)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::raw_table;

    #[derive(Debug)]
    struct CountRows {
        min: u64,
    }

    #[async_trait]
    impl Statement for CountRows {
        fn name(&self) -> &str {
            "count_rows"
        }

        async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
            let mut detail = Detail::new();
            detail.insert("rows".to_string(), Value::from(slice.num_rows()));
            Ok(detail)
        }

        fn result(&self, detail: &Detail) -> bool {
            detail.get("rows").and_then(Value::as_u64).unwrap_or(0) >= self.min
        }
    }

    #[derive(Debug)]
    struct CountRowsType;

    impl StatementType for CountRowsType {
        fn name(&self) -> &str {
            "count_rows"
        }

        fn expected_parameters(&self) -> &[&'static str] {
            &["min"]
        }

        fn table_only(&self) -> bool {
            true
        }

        fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
            Ok(Box::new(CountRows {
                min: options.optional_u64("min")?.unwrap_or(0),
            }))
        }
    }

    #[tokio::test]
    async fn test_evaluate_has_detail_and_result_only() {
        let table = raw_table(vec![("a", vec![Some("1"), Some("2")])]);
        let statement = CountRowsType
            .construct(&StatementOptions::new().with("min", 1))
            .unwrap();

        let report = statement.evaluate(&table).await.unwrap();
        assert!(report.result);

        let json = serde_json::to_value(&report).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["detail", "result"]);
    }

    #[tokio::test]
    async fn test_evaluate_is_idempotent() {
        let table = raw_table(vec![("a", vec![Some("1"), None])]);
        let statement = CountRowsType
            .construct(&StatementOptions::new().with("min", 5))
            .unwrap();
        let first = statement.evaluate(&table).await.unwrap();
        let second = statement.evaluate(&table).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.result);
    }

    #[test]
    fn test_construct_rejects_unknown_keys() {
        let err = CountRowsType
            .construct(&StatementOptions::new().with("mni", 1))
            .unwrap_err();
        assert!(matches!(
            err,
            TermError::UnexpectedParameters { ref unexpected, .. } if unexpected == &["mni"]
        ));
    }

    #[test]
    fn test_profile_not_supported_by_default() {
        let table = raw_table(vec![("a", vec![Some("1")])]);
        let err = CountRowsType.profile(&table).unwrap_err();
        assert!(matches!(err, TermError::NotSupported(_)));
    }

    #[test]
    fn test_scope_check() {
        assert!(check_scope(&CountRowsType, &Location::Table).is_ok());
        let err = check_scope(&CountRowsType, &Location::column("a")).unwrap_err();
        assert!(matches!(err, TermError::ScopeMismatch { .. }));
    }

    #[test]
    fn test_select_columns_in_requested_order() {
        let table = raw_table(vec![
            ("a", vec![Some("1")]),
            ("b", vec![Some("2")]),
            ("c", vec![Some("3")]),
        ]);
        let slice = select_columns(&table, &Location::columns(["c", "a"])).unwrap();
        let names: Vec<String> = slice
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(names, vec!["c", "a"]);

        let err = select_columns(&table, &Location::column("zz")).unwrap_err();
        assert!(matches!(err, TermError::ColumnNotFound { column } if column == "zz"));
    }
}
