//! The `column_expression` statement.

use super::{detail_f64, percent};
use crate::core::{Detail, Statement, StatementOptions, StatementType};
use crate::prelude::*;
use crate::security::SqlSecurity;
use arrow::array::{Array, Int64Array};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use datafusion::prelude::SessionContext;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

const SLICE_TABLE: &str = "slice";

/// Checks the share of rows satisfying every one of a list of boolean SQL
/// expressions over the scoped columns.
///
/// Expressions run against a table named `slice` holding only the scoped
/// columns, so referencing any other column fails the evaluation.
///
/// Options: `expressions` (a string or a list, required) and `at_least_%`
/// (default 100).
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnExpression;

#[derive(Debug)]
struct ColumnExpressionStatement {
    expressions: Vec<String>,
    at_least: f64,
}

impl StatementType for ColumnExpression {
    fn name(&self) -> &str {
        "column_expression"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &["expressions", "at_least_%"]
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        let expressions = options
            .optional_string_list("expressions")?
            .ok_or_else(|| TermError::configuration("missing required option 'expressions'"))?;
        if expressions.is_empty() {
            return Err(TermError::configuration("expressions must not be empty"));
        }
        for expression in &expressions {
            SqlSecurity::validate_sql_expression(expression)?;
        }

        Ok(Box::new(ColumnExpressionStatement {
            expressions,
            at_least: options.percent_or("at_least_%", 100.0)?,
        }))
    }
}

impl ColumnExpressionStatement {
    fn query(&self) -> String {
        let per_expression = self
            .expressions
            .iter()
            .enumerate()
            .map(|(i, e)| format!("COUNT(CASE WHEN ({e}) THEN 1 END) AS e{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let combined = self
            .expressions
            .iter()
            .map(|e| format!("({e})"))
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(
            "SELECT COUNT(*) AS total, {per_expression}, \
             COUNT(CASE WHEN {combined} THEN 1 END) AS valid FROM {SLICE_TABLE}"
        )
    }
}

fn count_at(batch: &RecordBatch, index: usize) -> Result<usize> {
    let column = batch
        .column(index)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| TermError::Internal("expression count is not an Int64".to_string()))?;
    if column.is_empty() || column.is_null(0) {
        return Ok(0);
    }
    Ok(column.value(0).max(0) as usize)
}

#[async_trait]
impl Statement for ColumnExpressionStatement {
    fn name(&self) -> &str {
        "column_expression"
    }

    #[instrument(skip(self, slice), fields(expressions = self.expressions.len()))]
    async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
        let ctx = SessionContext::new();
        ctx.register_batch(SLICE_TABLE, slice.clone())?;

        let sql = self.query();
        debug!(sql = %sql, "Running column expressions");
        let batches = ctx.sql(&sql).await?.collect().await?;
        let batch = batches
            .first()
            .filter(|b| b.num_rows() > 0)
            .ok_or_else(|| TermError::Internal("expression query returned no rows".to_string()))?;

        let rows = count_at(batch, 0)?;
        let valid_rows = count_at(batch, self.expressions.len() + 1)?;
        let expressions = self
            .expressions
            .iter()
            .enumerate()
            .map(|(i, expression)| -> Result<Value> {
                let mut entry = Map::new();
                entry.insert("expression".to_string(), Value::from(expression.as_str()));
                entry.insert("valid_rows".to_string(), Value::from(count_at(batch, i + 1)?));
                Ok(Value::Object(entry))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut detail = Detail::new();
        detail.insert("rows".to_string(), Value::from(rows));
        detail.insert("expressions".to_string(), Value::Array(expressions));
        detail.insert("valid_rows".to_string(), Value::from(valid_rows));
        detail.insert(
            "valid_rows_%".to_string(),
            Value::from(percent(valid_rows, rows)),
        );
        Ok(detail)
    }

    fn result(&self, detail: &Detail) -> bool {
        detail_f64(detail, "valid_rows_%").is_some_and(|pct| pct >= self.at_least)
    }
}
