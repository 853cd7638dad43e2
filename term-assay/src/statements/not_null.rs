//! The `not_null` statement.

use super::{detail_f64, null_flags, percent};
use crate::core::{Detail, Statement, StatementOptions, StatementType};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// How nulls across several scoped columns make a row null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MulticolumnLogic {
    /// A row is null when any scoped column is null
    #[default]
    Any,
    /// A row is null only when every scoped column is null
    All,
}

impl MulticolumnLogic {
    /// Returns the option value naming this logic.
    pub fn as_str(&self) -> &'static str {
        match self {
            MulticolumnLogic::Any => "any",
            MulticolumnLogic::All => "all",
        }
    }
}

impl FromStr for MulticolumnLogic {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "any" => Ok(MulticolumnLogic::Any),
            "all" => Ok(MulticolumnLogic::All),
            other => Err(TermError::configuration(format!(
                "multicolumn_logic must be 'any' or 'all', got '{other}'"
            ))),
        }
    }
}

/// Checks the share of rows without nulls in the scoped columns.
///
/// Options: `at_least_%` (default 100), `at_most_%` (default 100) and
/// `multicolumn_logic` (`any` or `all`, default `any`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

#[derive(Debug)]
struct NotNullStatement {
    at_least: f64,
    at_most: f64,
    logic: MulticolumnLogic,
}

impl StatementType for NotNull {
    fn name(&self) -> &str {
        "not_null"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &["at_least_%", "at_most_%", "multicolumn_logic"]
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        let at_least = options.percent_or("at_least_%", 100.0)?;
        let at_most = options.percent_or("at_most_%", 100.0)?;
        if at_least > at_most {
            return Err(TermError::configuration(format!(
                "at_least_% ({at_least}) must not exceed at_most_% ({at_most})"
            )));
        }
        let logic = options
            .optional_str("multicolumn_logic")?
            .map(MulticolumnLogic::from_str)
            .transpose()?
            .unwrap_or_default();
        Ok(Box::new(NotNullStatement {
            at_least,
            at_most,
            logic,
        }))
    }

    fn profile(&self, sample: &RecordBatch) -> Result<StatementOptions> {
        let detail = report(sample, MulticolumnLogic::Any);
        let observed = detail_f64(&detail, "not_null_rows_%").unwrap_or(100.0);
        Ok(StatementOptions::new()
            .with("at_least_%", observed)
            .with("at_most_%", observed))
    }
}

fn report(slice: &RecordBatch, logic: MulticolumnLogic) -> Detail {
    let rows = slice.num_rows();
    let null_rows = null_flags(slice, logic == MulticolumnLogic::All)
        .into_iter()
        .filter(|null| *null)
        .count();
    let not_null_rows = rows - null_rows;

    let mut detail = Detail::new();
    detail.insert("null_rows".to_string(), Value::from(null_rows));
    detail.insert("null_rows_%".to_string(), Value::from(percent(null_rows, rows)));
    detail.insert("not_null_rows".to_string(), Value::from(not_null_rows));
    detail.insert(
        "not_null_rows_%".to_string(),
        Value::from(percent(not_null_rows, rows)),
    );
    detail
}

#[async_trait]
impl Statement for NotNullStatement {
    fn name(&self) -> &str {
        "not_null"
    }

    async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
        Ok(report(slice, self.logic))
    }

    fn result(&self, detail: &Detail) -> bool {
        detail_f64(detail, "not_null_rows_%")
            .is_some_and(|pct| self.at_least <= pct && pct <= self.at_most)
    }
}
