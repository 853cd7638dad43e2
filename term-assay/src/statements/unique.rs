//! The `unique` statement.

use super::{detail_f64, percent, row_keys};
use crate::core::{Detail, Statement, StatementOptions, StatementType};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Checks the share of rows whose value tuple over the scoped columns occurs
/// exactly once. Nulls compare equal, so repeated nulls are not unique.
///
/// Options: `at_least_%` (default 100).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unique;

#[derive(Debug)]
struct UniqueStatement {
    at_least: f64,
}

fn report(slice: &RecordBatch) -> Result<Detail> {
    let keys = row_keys(slice)?;
    let mut occurrences: HashMap<_, usize> = HashMap::with_capacity(keys.len());
    for key in &keys {
        *occurrences.entry(key.row()).or_default() += 1;
    }
    let unique_rows = occurrences.values().filter(|count| **count == 1).count();

    let mut detail = Detail::new();
    detail.insert("unique_rows".to_string(), Value::from(unique_rows));
    detail.insert(
        "unique_rows_%".to_string(),
        Value::from(percent(unique_rows, slice.num_rows())),
    );
    Ok(detail)
}

impl StatementType for Unique {
    fn name(&self) -> &str {
        "unique"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &["at_least_%"]
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        Ok(Box::new(UniqueStatement {
            at_least: options.percent_or("at_least_%", 100.0)?,
        }))
    }

    fn profile(&self, sample: &RecordBatch) -> Result<StatementOptions> {
        let detail = report(sample)?;
        let observed = detail_f64(&detail, "unique_rows_%").unwrap_or(100.0);
        Ok(StatementOptions::new().with("at_least_%", observed))
    }
}

#[async_trait]
impl Statement for UniqueStatement {
    fn name(&self) -> &str {
        "unique"
    }

    async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
        report(slice)
    }

    fn result(&self, detail: &Detail) -> bool {
        detail_f64(detail, "unique_rows_%").is_some_and(|pct| pct >= self.at_least)
    }
}
