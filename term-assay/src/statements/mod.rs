//! Built-in statement types.
//!
//! | identifier          | scope   | checks                                     |
//! |---------------------|---------|--------------------------------------------|
//! | `not_null`          | columns | share of rows without nulls                |
//! | `unique`            | columns | share of rows whose value tuple is unique  |
//! | `row_count`         | table   | number of (distinct) rows within bounds    |
//! | `contain`           | columns | presence and exclusivity of listed values  |
//! | `column_expression` | columns | share of rows satisfying SQL predicates    |

mod column_expression;
mod contain;
mod not_null;
mod row_count;
mod unique;

pub use column_expression::ColumnExpression;
pub use contain::{Contain, ContainRule, PROFILE_DISTINCT_LIMIT};
pub use not_null::{MulticolumnLogic, NotNull};
pub use row_count::RowCount;
pub use unique::Unique;

use crate::coercion::temporal;
use crate::core::{Detail, StatementRegistry};
use crate::prelude::*;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float64Type, Int64Type, Time64MicrosecondType, TimeUnit,
    TimestampMicrosecondType,
};
use arrow::record_batch::RecordBatch;
use arrow::row::{OwnedRow, RowConverter, SortField};
use arrow::util::display::array_value_to_string;
use serde_json::Value;
use std::sync::Arc;

/// Registers every built-in statement type under its identifier.
///
/// Identifiers already present in `registry` are left untouched.
pub fn register_builtins(registry: &mut StatementRegistry) {
    let builtins: [Arc<dyn crate::core::StatementType>; 5] = [
        Arc::new(NotNull),
        Arc::new(Unique),
        Arc::new(RowCount),
        Arc::new(Contain),
        Arc::new(ColumnExpression),
    ];
    for statement_type in builtins {
        let identifier = statement_type.name().to_string();
        if !registry.contains(&identifier) {
            // The identifier is free, so no collision policy applies.
            let _ = registry.register(identifier, statement_type);
        }
    }
}

/// `part` as a percentage of `total`; an empty total counts as 100%.
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Reads a number from a report detail.
pub(crate) fn detail_f64(detail: &Detail, key: &str) -> Option<f64> {
    detail.get(key).and_then(Value::as_f64)
}

/// Reads a count from a report detail.
pub(crate) fn detail_u64(detail: &Detail, key: &str) -> Option<u64> {
    detail.get(key).and_then(Value::as_u64)
}

/// One comparable row key per row of `slice`, across all its columns.
///
/// Nulls compare equal to each other.
pub(crate) fn row_keys(slice: &RecordBatch) -> Result<Vec<OwnedRow>> {
    let fields = slice
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(slice.columns())?;
    Ok(rows.iter().map(|row| row.owned()).collect())
}

/// Whether a row has a null in any / every column of `slice`.
pub(crate) fn null_flags(slice: &RecordBatch, all: bool) -> Vec<bool> {
    (0..slice.num_rows())
        .map(|row| {
            let mut nulls = slice.columns().iter().map(|c| c.is_null(row));
            if all {
                slice.num_columns() > 0 && nulls.all(|n| n)
            } else {
                nulls.any(|n| n)
            }
        })
        .collect()
}

/// A hashable cell value used to compare table cells with configured values.
///
/// Integral floats compare equal to integers; temporal cells are compared by
/// their canonical text (`%Y-%m-%d`, `%H:%M:%S`, `%Y-%m-%d %H:%M:%S`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

impl ValueKey {
    fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            ValueKey::Int(value as i64)
        } else {
            ValueKey::Float(value.to_bits())
        }
    }

    /// Converts a configured scalar value.
    pub(crate) fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(ValueKey::Null),
            Value::Bool(b) => Ok(ValueKey::Bool(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(ValueKey::Int(i)),
                (None, Some(f)) => Ok(Self::from_f64(f)),
                (None, None) => Err(TermError::configuration(format!(
                    "value {n} is out of range"
                ))),
            },
            Value::String(s) => Ok(ValueKey::Text(s.clone())),
            other => Err(TermError::configuration(format!(
                "expected a scalar value, got {other}"
            ))),
        }
    }

    /// Reads one cell.
    pub(crate) fn from_cell(array: &dyn Array, row: usize) -> Result<Self> {
        if array.is_null(row) {
            return Ok(ValueKey::Null);
        }
        let key = match array.data_type() {
            DataType::Int64 => ValueKey::Int(array.as_primitive::<Int64Type>().value(row)),
            DataType::Float64 => Self::from_f64(array.as_primitive::<Float64Type>().value(row)),
            DataType::Boolean => ValueKey::Bool(array.as_boolean().value(row)),
            DataType::Utf8 => ValueKey::Text(array.as_string::<i32>().value(row).to_string()),
            DataType::Date32 => match array.as_primitive::<Date32Type>().value_as_date(row) {
                Some(date) => ValueKey::Text(temporal::format_date(
                    date,
                    temporal::DEFAULT_DATE_FORMAT,
                )),
                None => ValueKey::Null,
            },
            DataType::Time64(TimeUnit::Microsecond) => {
                match array.as_primitive::<Time64MicrosecondType>().value_as_time(row) {
                    Some(time) => ValueKey::Text(temporal::format_time(time, "%H:%M:%S%.f")),
                    None => ValueKey::Null,
                }
            }
            DataType::Timestamp(TimeUnit::Microsecond, None) => {
                match array
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row)
                {
                    Some(datetime) => ValueKey::Text(temporal::format_datetime(
                        datetime,
                        "%Y-%m-%d %H:%M:%S%.f",
                    )),
                    None => ValueKey::Null,
                }
            }
            _ => ValueKey::Text(array_value_to_string(array, row)?),
        };
        Ok(key)
    }

    /// Converts back to JSON for reports and profiles.
    pub(crate) fn to_json(&self) -> Value {
        match self {
            ValueKey::Null => Value::Null,
            ValueKey::Bool(b) => Value::Bool(*b),
            ValueKey::Int(i) => Value::from(*i),
            ValueKey::Float(bits) => Value::from(f64::from_bits(*bits)),
            ValueKey::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Reads the value tuple of every row of `slice`.
pub(crate) fn value_keys(slice: &RecordBatch) -> Result<Vec<Vec<ValueKey>>> {
    (0..slice.num_rows())
        .map(|row| {
            slice
                .columns()
                .iter()
                .map(|column| ValueKey::from_cell(column.as_ref(), row))
                .collect()
        })
        .collect()
}

/// Renders a value tuple: a scalar for one column, a list for several.
pub(crate) fn tuple_to_json(tuple: &[ValueKey]) -> Value {
    match tuple {
        [single] => single.to_json(),
        many => Value::Array(many.iter().map(ValueKey::to_json).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::orders_table;
    use serde_json::json;

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(0, 0), 100.0);
    }

    #[test]
    fn test_value_keys_compare_numbers_by_value() {
        assert_eq!(ValueKey::from_json(&json!(1)).unwrap(), ValueKey::from_json(&json!(1.0)).unwrap());
        assert_ne!(ValueKey::from_json(&json!("1")).unwrap(), ValueKey::from_json(&json!(1)).unwrap());
        assert!(ValueKey::from_json(&json!([1])).is_err());
    }

    #[test]
    fn test_row_keys_treat_nulls_as_equal() {
        let table = orders_table();
        let slice = table.project(&[1]).unwrap();
        let keys = row_keys(&slice).unwrap();
        assert_eq!(keys.len(), table.num_rows());
    }

    #[test]
    fn test_tuple_to_json() {
        assert_eq!(tuple_to_json(&[ValueKey::Int(1)]), json!(1));
        assert_eq!(
            tuple_to_json(&[ValueKey::Int(1), ValueKey::Text("a".to_string())]),
            json!([1, "a"])
        );
    }
}
