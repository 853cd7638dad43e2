//! Typed ingestion: coercing raw text columns into canonical typed columns.
//!
//! A raw table is an Arrow [`RecordBatch`] whose columns hold text. Each
//! column named in the [`TypingOptions`] is parsed according to its
//! [`ColumnDescriptor`]; columns without a descriptor are passed through
//! untouched. Coercion never drops or reorders rows:
//!
//! - values that fail to parse become null and are recorded as
//!   [`ViolationKind::ParseFailure`],
//! - nulls in non-nullable columns (including those introduced by parse
//!   failures) are recorded as [`ViolationKind::NullNotAllowed`],
//! - repeated non-null values in unique columns are recorded as
//!   [`ViolationKind::Duplicate`]; nulls never collide.
//!
//! By default violations are collected and returned with the typed table so
//! downstream statements can surface them. [`CoercionMode::Strict`] aborts on
//! the first violation instead.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use arrow::array::{Array, AsArray, StringArray};
//! use arrow::datatypes::{DataType, Field, Int64Type, Schema};
//! use arrow::record_batch::RecordBatch;
//! use term_assay::coercion::{coerce, ColumnDescriptor, ColumnType, TypingOptions};
//!
//! # fn main() -> term_assay::prelude::Result<()> {
//! let schema = Arc::new(Schema::new(vec![Field::new("qty", DataType::Utf8, true)]));
//! let raw = RecordBatch::try_new(
//!     schema,
//!     vec![Arc::new(StringArray::from(vec![Some("1.234"), Some("")]))],
//! )?;
//!
//! let typing = TypingOptions::new().with_column(
//!     "qty",
//!     ColumnDescriptor::new(ColumnType::Int64).with_thousands_sep('.'),
//! );
//! let coerced = coerce(&raw, &typing)?;
//!
//! let qty = coerced.table.column(0).as_primitive::<Int64Type>();
//! assert_eq!(qty.value(0), 1234);
//! assert!(qty.is_null(1));
//! assert_eq!(coerced.violations.len(), 1);
//! # Ok(())
//! # }
//! ```

mod descriptor;
pub mod numeric;
pub mod temporal;
mod violation;

pub use descriptor::{
    ColumnDescriptor, ColumnType, TypingOptions, DEFAULT_FALSIES, DEFAULT_TRUTHIES,
};
pub use violation::{IntegrityViolation, ViolationKind};

use crate::prelude::*;
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
    Time64MicrosecondArray, TimestampMicrosecondArray,
};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Date32Type, Field, Float64Type, Int64Type, Schema, Time64MicrosecondType,
    TimestampMicrosecondType,
};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// How coercion reacts to integrity violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Record violations and keep going (degraded values become null)
    #[default]
    Lenient,
    /// Abort on the first violation
    Strict,
}

/// The result of coercing a raw table.
#[derive(Debug, Clone)]
pub struct CoercedTable {
    /// The typed table, same rows in the same order as the input
    pub table: RecordBatch,
    /// Every integrity violation found, grouped by column in schema order
    pub violations: Vec<IntegrityViolation>,
}

impl CoercedTable {
    /// Returns true when no violation was recorded.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations recorded for one column.
    pub fn violations_for<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = &'a IntegrityViolation> + 'a {
        self.violations.iter().filter(move |v| v.column == column)
    }

    /// Splits into the typed table and the violations.
    pub fn into_parts(self) -> (RecordBatch, Vec<IntegrityViolation>) {
        (self.table, self.violations)
    }
}

/// Coerces raw tables according to column typing options.
#[derive(Debug, Clone, Default)]
pub struct Coercer {
    mode: CoercionMode,
}

impl Coercer {
    /// Creates a lenient coercer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a coercer that aborts on the first violation.
    pub fn strict() -> Self {
        Self {
            mode: CoercionMode::Strict,
        }
    }

    /// Sets the coercion mode.
    pub fn with_mode(mut self, mode: CoercionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the coercion mode.
    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Coerces `raw` into a typed table.
    ///
    /// # Errors
    ///
    /// - [`TermError::Configuration`] if a descriptor is invalid
    /// - [`TermError::ColumnNotFound`] if a declared column is missing from `raw`
    /// - [`TermError::Integrity`] on the first violation in strict mode
    #[instrument(skip(self, raw, options), fields(
        coercion.mode = ?self.mode,
        table.rows = raw.num_rows(),
        table.columns = raw.num_columns(),
        typing.columns = options.len()
    ))]
    pub fn coerce(&self, raw: &RecordBatch, options: &TypingOptions) -> Result<CoercedTable> {
        options.validate()?;

        let schema = raw.schema();
        for (name, _) in options.iter() {
            if schema.index_of(name).is_err() {
                return Err(TermError::ColumnNotFound {
                    column: name.to_string(),
                });
            }
        }

        let mut fields = Vec::with_capacity(raw.num_columns());
        let mut columns = Vec::with_capacity(raw.num_columns());
        let mut violations = Vec::new();

        for (field, column) in schema.fields().iter().zip(raw.columns()) {
            let Some(descriptor) = options.get(field.name()) else {
                debug!(column.name = %field.name(), "Passing column through untyped");
                fields.push(field.as_ref().clone());
                columns.push(Arc::clone(column));
                continue;
            };

            let (array, column_violations) = coerce_column(field.name(), column, descriptor)?;
            if self.mode == CoercionMode::Strict {
                if let Some(first) = column_violations.into_iter().next() {
                    warn!(violation = %first, "Aborting strict coercion");
                    return Err(TermError::Integrity(first));
                }
            } else {
                if !column_violations.is_empty() {
                    debug!(
                        column.name = %field.name(),
                        column.type = %descriptor.column_type,
                        violations = column_violations.len(),
                        "Column has integrity violations"
                    );
                }
                violations.extend(column_violations);
            }

            fields.push(Field::new(
                field.name(),
                descriptor.column_type.arrow_type(),
                true,
            ));
            columns.push(array);
        }

        let table = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        info!(
            table.rows = table.num_rows(),
            violations = violations.len(),
            "Coercion completed"
        );
        Ok(CoercedTable { table, violations })
    }
}

/// Coerces `raw` with a lenient [`Coercer`].
pub fn coerce(raw: &RecordBatch, options: &TypingOptions) -> Result<CoercedTable> {
    Coercer::new().coerce(raw, options)
}

/// Parsed values of one column before conversion to an Arrow array.
enum ParsedColumn {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    String(Vec<Option<String>>),
    Date(Vec<Option<i32>>),
    Time(Vec<Option<i64>>),
    DateTime(Vec<Option<i64>>),
    Boolean(Vec<Option<bool>>),
}

impl ParsedColumn {
    fn null_rows(&self) -> Vec<usize> {
        fn nulls<T>(values: &[Option<T>]) -> Vec<usize> {
            values
                .iter()
                .enumerate()
                .filter_map(|(row, v)| v.is_none().then_some(row))
                .collect()
        }
        match self {
            ParsedColumn::Int64(v) => nulls(v),
            ParsedColumn::Float64(v) => nulls(v),
            ParsedColumn::String(v) => nulls(v),
            ParsedColumn::Date(v) => nulls(v),
            ParsedColumn::Time(v) => nulls(v),
            ParsedColumn::DateTime(v) => nulls(v),
            ParsedColumn::Boolean(v) => nulls(v),
        }
    }

    /// `(row, first_row)` for every repeated non-null value.
    fn duplicate_rows(&self) -> Vec<(usize, usize)> {
        match self {
            ParsedColumn::Int64(v) => duplicates(v.iter().map(|x| x.as_ref())),
            // -0.0 and 0.0 collide; every NaN collides with every other NaN
            ParsedColumn::Float64(v) => duplicates(v.iter().map(|x| {
                x.map(|f| if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() })
            })),
            ParsedColumn::String(v) => duplicates(v.iter().map(|x| x.as_deref())),
            ParsedColumn::Date(v) => duplicates(v.iter().map(|x| x.as_ref())),
            ParsedColumn::Time(v) => duplicates(v.iter().map(|x| x.as_ref())),
            ParsedColumn::DateTime(v) => duplicates(v.iter().map(|x| x.as_ref())),
            ParsedColumn::Boolean(v) => duplicates(v.iter().map(|x| x.as_ref())),
        }
    }

    fn into_array(self) -> ArrayRef {
        match self {
            ParsedColumn::Int64(v) => Arc::new(Int64Array::from(v)),
            ParsedColumn::Float64(v) => Arc::new(Float64Array::from(v)),
            ParsedColumn::String(v) => Arc::new(StringArray::from(v)),
            ParsedColumn::Date(v) => Arc::new(Date32Array::from(v)),
            ParsedColumn::Time(v) => Arc::new(Time64MicrosecondArray::from(v)),
            ParsedColumn::DateTime(v) => Arc::new(TimestampMicrosecondArray::from(v)),
            ParsedColumn::Boolean(v) => Arc::new(BooleanArray::from(v)),
        }
    }
}

fn duplicates<K, I>(keys: I) -> Vec<(usize, usize)>
where
    K: Hash + Eq,
    I: Iterator<Item = Option<K>>,
{
    let mut first_seen: HashMap<K, usize> = HashMap::new();
    let mut repeated = Vec::new();
    for (row, key) in keys.enumerate() {
        let Some(key) = key else { continue };
        match first_seen.get(&key) {
            Some(&first_row) => repeated.push((row, first_row)),
            None => {
                first_seen.insert(key, row);
            }
        }
    }
    repeated
}

/// Parses every cell with `parse`, recording failures against `column`.
fn parse_cells<T>(
    column: &str,
    raw: &StringArray,
    expected: ColumnType,
    violations: &mut Vec<IntegrityViolation>,
    parse: impl Fn(&str) -> Option<T>,
) -> Vec<Option<T>> {
    (0..raw.len())
        .map(|row| {
            if raw.is_null(row) {
                return None;
            }
            let text = raw.value(row).trim();
            if text.is_empty() {
                return None;
            }
            let parsed = parse(text);
            if parsed.is_none() {
                violations.push(IntegrityViolation::parse_failure(column, row, text, expected));
            }
            parsed
        })
        .collect()
}

fn coerce_column(
    name: &str,
    column: &ArrayRef,
    descriptor: &ColumnDescriptor,
) -> Result<(ArrayRef, Vec<IntegrityViolation>)> {
    let text = match column.data_type() {
        DataType::Utf8 => Arc::clone(column),
        _ => cast(column.as_ref(), &DataType::Utf8)?,
    };
    let raw = text.as_string::<i32>();

    let ty = descriptor.column_type;
    let mut violations = Vec::new();
    let parsed = match ty {
        ColumnType::Int64 => ParsedColumn::Int64(parse_cells(name, raw, ty, &mut violations, |s| {
            numeric::parse_i64(s, descriptor.thousands_sep)
        })),
        ColumnType::Float64 => {
            ParsedColumn::Float64(parse_cells(name, raw, ty, &mut violations, |s| {
                numeric::parse_f64(s, descriptor.thousands_sep, descriptor.decimal_sep)
            }))
        }
        ColumnType::String => ParsedColumn::String(parse_cells(name, raw, ty, &mut violations, |s| {
            Some(s.to_string())
        })),
        ColumnType::Date => ParsedColumn::Date(parse_cells(name, raw, ty, &mut violations, |s| {
            temporal::parse_date(s, descriptor.format_pattern())
        })),
        ColumnType::Time => ParsedColumn::Time(parse_cells(name, raw, ty, &mut violations, |s| {
            temporal::parse_time(s, descriptor.format_pattern())
        })),
        ColumnType::DateTime => {
            ParsedColumn::DateTime(parse_cells(name, raw, ty, &mut violations, |s| {
                temporal::parse_datetime(s, descriptor.format_pattern())
            }))
        }
        ColumnType::Boolean => {
            ParsedColumn::Boolean(parse_cells(name, raw, ty, &mut violations, |s| {
                descriptor.parse_boolean(s)
            }))
        }
    };

    if !descriptor.nullable {
        violations.extend(
            parsed
                .null_rows()
                .into_iter()
                .map(|row| IntegrityViolation::null_not_allowed(name, row)),
        );
    }
    if descriptor.unique {
        violations.extend(
            parsed
                .duplicate_rows()
                .into_iter()
                .map(|(row, first_row)| IntegrityViolation::duplicate(name, row, first_row)),
        );
    }

    Ok((parsed.into_array(), violations))
}

/// Formats one typed cell back to text using the descriptor's separators,
/// format pattern or boolean tokens. Returns `None` for null cells.
///
/// For well-formed input, `format_value(coerce(text)) == text` holds once the
/// text is in its normalized form (no surrounding whitespace, canonical digit
/// grouping, shortest float digits).
pub fn format_value(
    array: &dyn Array,
    row: usize,
    descriptor: &ColumnDescriptor,
) -> Result<Option<String>> {
    if array.is_null(row) {
        return Ok(None);
    }
    let mismatch = || TermError::Internal(format!(
        "array of type {} does not hold {} values",
        array.data_type(),
        descriptor.column_type
    ));
    if array.data_type() != &descriptor.column_type.arrow_type() {
        return Err(mismatch());
    }

    let text = match descriptor.column_type {
        ColumnType::Int64 => numeric::format_i64(
            array.as_primitive::<Int64Type>().value(row),
            descriptor.thousands_sep,
        ),
        ColumnType::Float64 => numeric::format_f64(
            array.as_primitive::<Float64Type>().value(row),
            descriptor.thousands_sep,
            descriptor.decimal_sep,
        ),
        ColumnType::String => array.as_string::<i32>().value(row).to_string(),
        ColumnType::Date => {
            let date = array
                .as_primitive::<Date32Type>()
                .value_as_date(row)
                .ok_or_else(mismatch)?;
            temporal::format_date(date, descriptor.format_pattern())
        }
        ColumnType::Time => {
            let time = array
                .as_primitive::<Time64MicrosecondType>()
                .value_as_time(row)
                .ok_or_else(mismatch)?;
            temporal::format_time(time, descriptor.format_pattern())
        }
        ColumnType::DateTime => {
            let datetime = array
                .as_primitive::<TimestampMicrosecondType>()
                .value_as_datetime(row)
                .ok_or_else(mismatch)?;
            temporal::format_datetime(datetime, descriptor.format_pattern())
        }
        ColumnType::Boolean => descriptor
            .boolean_token(array.as_boolean().value(row))
            .to_string(),
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::raw_table;
    use arrow::datatypes::{DataType, TimeUnit};

    fn single(values: Vec<Option<&str>>, descriptor: ColumnDescriptor) -> CoercedTable {
        let raw = raw_table(vec![("value", values)]);
        coerce(&raw, &TypingOptions::new().with_column("value", descriptor)).unwrap()
    }

    #[test]
    fn test_int_with_thousands_and_empty_value() {
        let coerced = single(
            vec![Some("1.234"), Some("")],
            ColumnDescriptor::new(ColumnType::Int64).with_thousands_sep('.'),
        );
        let values = coerced.table.column(0).as_primitive::<Int64Type>();
        assert_eq!(values.value(0), 1234);
        assert!(values.is_null(1));
        assert_eq!(
            coerced.violations,
            vec![IntegrityViolation::null_not_allowed("value", 1)]
        );
    }

    #[test]
    fn test_european_float() {
        let coerced = single(
            vec![Some("1.234,56")],
            ColumnDescriptor::new(ColumnType::Float64)
                .with_thousands_sep('.')
                .with_decimal_sep(','),
        );
        let values = coerced.table.column(0).as_primitive::<Float64Type>();
        assert_eq!(values.value(0), 1234.56);
        assert!(coerced.is_clean());
    }

    #[test]
    fn test_parse_failure_degrades_to_null_and_counts_as_null() {
        let coerced = single(
            vec![Some("12"), Some("twelve"), None],
            ColumnDescriptor::new(ColumnType::Int64),
        );
        let values = coerced.table.column(0).as_primitive::<Int64Type>();
        assert_eq!(values.null_count(), 2);
        assert_eq!(coerced.violations.len(), 3);
        assert!(coerced.violations[0].is_parse_failure());
        assert_eq!(coerced.violations[0].row, 1);
        assert_eq!(coerced.violations[1].kind, ViolationKind::NullNotAllowed);
        assert_eq!(coerced.violations[2].row, 2);
    }

    #[test]
    fn test_nullable_column_reports_only_parse_failures() {
        let coerced = single(
            vec![Some("x"), None],
            ColumnDescriptor::new(ColumnType::Float64).with_nullable(true),
        );
        assert_eq!(coerced.violations.len(), 1);
        assert!(coerced.violations[0].is_parse_failure());
    }

    #[test]
    fn test_uniqueness_ignores_nulls() {
        let coerced = single(
            vec![Some("a"), Some(" a "), None, Some("bad"), Some("b"), None],
            ColumnDescriptor::new(ColumnType::String)
                .with_nullable(true)
                .with_unique(true),
        );
        assert_eq!(
            coerced.violations,
            vec![IntegrityViolation::duplicate("value", 1, 0)]
        );
    }

    #[test]
    fn test_parse_failure_nulls_do_not_collide() {
        let coerced = single(
            vec![Some("x"), Some("y"), Some("1")],
            ColumnDescriptor::new(ColumnType::Int64)
                .with_nullable(true)
                .with_unique(true),
        );
        assert!(coerced.violations.iter().all(IntegrityViolation::is_parse_failure));
        assert_eq!(coerced.violations.len(), 2);
    }

    #[test]
    fn test_float_duplicates_by_value() {
        let coerced = single(
            vec![Some("1,50"), Some("1,5"), Some("0"), Some("-0")],
            ColumnDescriptor::new(ColumnType::Float64)
                .with_decimal_sep(',')
                .with_unique(true),
        );
        assert_eq!(
            coerced.violations,
            vec![
                IntegrityViolation::duplicate("value", 1, 0),
                IntegrityViolation::duplicate("value", 3, 2),
            ]
        );
    }

    #[test]
    fn test_temporal_and_boolean_types() {
        let raw = raw_table(vec![
            ("day", vec![Some("20240131"), Some("2024-01-31")]),
            ("at", vec![Some("08:30:00"), Some("8h30")]),
            ("ts", vec![Some("20240131"), Some("2024-01-31 10:00:00")]),
            ("flag", vec![Some(" Yes "), Some("nope")]),
        ]);
        let typing = TypingOptions::new()
            .with_column(
                "day",
                ColumnDescriptor::new(ColumnType::Date)
                    .with_format("%Y%m%d")
                    .with_nullable(true),
            )
            .with_column(
                "at",
                ColumnDescriptor::new(ColumnType::Time).with_nullable(true),
            )
            .with_column(
                "ts",
                ColumnDescriptor::new(ColumnType::DateTime)
                    .with_format("%Y%m%d")
                    .with_nullable(true),
            )
            .with_column(
                "flag",
                ColumnDescriptor::new(ColumnType::Boolean).with_nullable(true),
            );

        let coerced = coerce(&raw, &typing).unwrap();
        let schema = coerced.table.schema();
        assert_eq!(schema.field(0).data_type(), &DataType::Date32);
        assert_eq!(
            schema.field(1).data_type(),
            &DataType::Time64(TimeUnit::Microsecond)
        );
        assert_eq!(
            schema.field(2).data_type(),
            &DataType::Timestamp(TimeUnit::Microsecond, None)
        );
        assert_eq!(schema.field(3).data_type(), &DataType::Boolean);

        assert_eq!(coerced.violations.len(), 4);
        assert!(coerced.violations.iter().all(|v| v.row == 1));
        assert!(coerced.table.column(3).as_boolean().value(0));
    }

    #[test]
    fn test_undeclared_columns_pass_through() {
        let raw = raw_table(vec![
            ("id", vec![Some("1"), Some("2")]),
            ("note", vec![Some(" keep "), None]),
        ]);
        let typing =
            TypingOptions::new().with_column("id", ColumnDescriptor::new(ColumnType::Int64));
        let coerced = coerce(&raw, &typing).unwrap();

        assert_eq!(coerced.table.num_rows(), 2);
        assert_eq!(coerced.table.schema().field(1).data_type(), &DataType::Utf8);
        assert_eq!(coerced.table.column(1).as_string::<i32>().value(0), " keep ");
    }

    #[test]
    fn test_missing_declared_column() {
        let raw = raw_table(vec![("id", vec![Some("1")])]);
        let typing =
            TypingOptions::new().with_column("missing", ColumnDescriptor::new(ColumnType::Int64));
        let err = coerce(&raw, &typing).unwrap_err();
        assert!(matches!(err, TermError::ColumnNotFound { column } if column == "missing"));
    }

    #[test]
    fn test_strict_mode_aborts_on_first_violation() {
        let raw = raw_table(vec![("id", vec![Some("1"), Some("x"), Some("")])]);
        let typing =
            TypingOptions::new().with_column("id", ColumnDescriptor::new(ColumnType::Int64));
        let err = Coercer::strict().coerce(&raw, &typing).unwrap_err();
        match err {
            TermError::Integrity(violation) => {
                assert_eq!(violation.row, 1);
                assert!(violation.is_parse_failure());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_text_input_is_cast_first() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, true)]));
        let raw = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![5, 6]))])
            .unwrap();
        let typing =
            TypingOptions::new().with_column("n", ColumnDescriptor::new(ColumnType::Float64));
        let coerced = coerce(&raw, &typing).unwrap();
        assert_eq!(coerced.table.column(0).as_primitive::<Float64Type>().value(1), 6.0);
    }

    #[test]
    fn test_format_value_round_trip() {
        let cases = vec![
            (
                ColumnDescriptor::new(ColumnType::Int64).with_thousands_sep('.'),
                vec!["1.234", "-98.765.432", "7"],
            ),
            (
                ColumnDescriptor::new(ColumnType::Float64)
                    .with_thousands_sep('.')
                    .with_decimal_sep(','),
                vec!["1.234,56", "0,001", "-12"],
            ),
            (
                ColumnDescriptor::new(ColumnType::Date).with_format("%d/%m/%Y"),
                vec!["31/12/1999", "01/01/2030"],
            ),
            (
                ColumnDescriptor::new(ColumnType::Time),
                vec!["00:00:00", "23:59:59"],
            ),
            (
                ColumnDescriptor::new(ColumnType::DateTime).with_format("%Y%m%d %H%M"),
                vec!["20240229 1315"],
            ),
            (
                ColumnDescriptor::new(ColumnType::Boolean).with_boolean_tokens(["S"], ["N"]),
                vec!["S", "N"],
            ),
            (ColumnDescriptor::new(ColumnType::String), vec!["abc"]),
        ];

        for (descriptor, texts) in cases {
            let coerced = single(texts.iter().map(|t| Some(*t)).collect(), descriptor.clone());
            assert!(coerced.is_clean(), "{:?}", coerced.violations);
            let column = coerced.table.column(0);
            for (row, text) in texts.iter().enumerate() {
                let formatted = format_value(column.as_ref(), row, &descriptor).unwrap();
                assert_eq!(formatted.as_deref(), Some(*text));
            }
        }
    }

    #[test]
    fn test_row_count_and_order_preserved() {
        let values: Vec<Option<&str>> = vec![Some("3"), None, Some("x"), Some("1"), Some("2")];
        let coerced = single(
            values,
            ColumnDescriptor::new(ColumnType::Int64).with_nullable(true),
        );
        let column = coerced.table.column(0).as_primitive::<Int64Type>();
        assert_eq!(column.len(), 5);
        assert_eq!(column.value(0), 3);
        assert_eq!(column.value(3), 1);
        assert_eq!(column.value(4), 2);
    }
}
