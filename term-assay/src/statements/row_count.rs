//! The `row_count` statement.

use super::{detail_u64, row_keys};
use crate::core::{Detail, Statement, StatementOptions, StatementType};
use crate::prelude::*;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

/// Checks that the number of rows, or of distinct rows, lies within bounds.
///
/// Table-only. Options: `min`, `max` (both optional, inclusive) and
/// `distinct` (default false).
#[derive(Debug, Clone, Copy, Default)]
pub struct RowCount;

#[derive(Debug)]
struct RowCountStatement {
    min: Option<u64>,
    max: Option<u64>,
    distinct: bool,
}

fn report(table: &RecordBatch) -> Result<Detail> {
    let keys = row_keys(table)?;
    let distinct_rows = keys.iter().map(|key| key.row()).collect::<HashSet<_>>().len();

    let mut detail = Detail::new();
    detail.insert("rows".to_string(), Value::from(table.num_rows()));
    detail.insert("distinct_rows".to_string(), Value::from(distinct_rows));
    Ok(detail)
}

impl StatementType for RowCount {
    fn name(&self) -> &str {
        "row_count"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &["min", "max", "distinct"]
    }

    fn table_only(&self) -> bool {
        true
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        let min = options.optional_u64("min")?;
        let max = options.optional_u64("max")?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(TermError::configuration(format!(
                    "min ({min}) must not exceed max ({max})"
                )));
            }
        }
        Ok(Box::new(RowCountStatement {
            min,
            max,
            distinct: options.bool_or("distinct", false)?,
        }))
    }

    fn profile(&self, sample: &RecordBatch) -> Result<StatementOptions> {
        let rows = sample.num_rows();
        Ok(StatementOptions::new().with("min", rows).with("max", rows))
    }
}

#[async_trait]
impl Statement for RowCountStatement {
    fn name(&self) -> &str {
        "row_count"
    }

    async fn report(&self, table: &RecordBatch) -> Result<Detail> {
        report(table)
    }

    fn result(&self, detail: &Detail) -> bool {
        let key = if self.distinct { "distinct_rows" } else { "rows" };
        let Some(count) = detail_u64(detail, key) else {
            return false;
        };
        self.min.map_or(true, |min| count >= min) && self.max.map_or(true, |max| count <= max)
    }
}
