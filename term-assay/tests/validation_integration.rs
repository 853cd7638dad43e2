//! End-to-end tests: raw text in, typed table and aggregated report out.

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use term_assay::coercion::{coerce, Coercer, ViolationKind};
use term_assay::core::{
    CollisionPolicy, Detail, Statement, StatementOptions, StatementRegistry, StatementType,
};
use term_assay::prelude::*;
use term_assay::sources::{data_reader, DelimitedOptions};

fn raw(columns: Vec<(&str, Vec<&str>)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
}

fn shipments() -> RecordBatch {
    raw(vec![
        ("id", vec!["1", "2", "3", "4"]),
        ("weight", vec!["1.234,5", "12,0", "", "7"]),
        ("country", vec!["BR", "BR", "US", "DE"]),
        ("shipped", vec!["2024-01-02", "2024-01-03", "02/01/2024", "2024-01-05"]),
    ])
}

fn shipments_typing() -> TypingOptions {
    TypingOptions::new()
        .with_column("id", ColumnDescriptor::new(ColumnType::Int64).with_unique(true))
        .with_column(
            "weight",
            ColumnDescriptor::new(ColumnType::Float64)
                .with_nullable(true)
                .with_thousands_sep('.')
                .with_decimal_sep(','),
        )
        .with_column("shipped", ColumnDescriptor::new(ColumnType::Date))
}

#[test]
fn test_integer_with_thousands_dot() {
    let table = raw(vec![("qty", vec!["1.234", ""])]);
    let typing = TypingOptions::new().with_column(
        "qty",
        ColumnDescriptor::new(ColumnType::Int64).with_thousands_sep('.'),
    );
    let coerced = coerce(&table, &typing).unwrap();

    let qty = coerced.table.column(0).as_primitive::<Int64Type>();
    assert_eq!(qty.value(0), 1234);
    assert!(qty.is_null(1));
    assert_eq!(coerced.violations.len(), 1);
    assert_eq!(coerced.violations[0].row, 1);
    assert_eq!(coerced.violations[0].kind, ViolationKind::NullNotAllowed);
}

#[test]
fn test_float_with_locale_separators() {
    let table = raw(vec![("price", vec!["1.234,56"])]);
    let typing = TypingOptions::new().with_column(
        "price",
        ColumnDescriptor::new(ColumnType::Float64)
            .with_thousands_sep('.')
            .with_decimal_sep(','),
    );
    let coerced = coerce(&table, &typing).unwrap();
    let price = coerced.table.column(0).as_primitive::<Float64Type>();
    assert_eq!(price.value(0), 1234.56);
    assert!(coerced.is_clean());
}

#[test]
fn test_parse_failures_are_collected_not_raised() {
    let coerced = coerce(&shipments(), &shipments_typing()).unwrap();
    assert_eq!(coerced.table.num_rows(), 4);
    assert_eq!(coerced.table.num_columns(), 4);
    assert_eq!(coerced.table.schema().field(2).data_type(), &DataType::Utf8);

    let shipped: Vec<_> = coerced.violations_for("shipped").collect();
    assert_eq!(shipped.len(), 2);
    assert!(shipped[0].is_parse_failure());
    assert_eq!(shipped[1].kind, ViolationKind::NullNotAllowed);

    let strict = Coercer::strict().coerce(&shipments(), &shipments_typing());
    assert!(matches!(strict, Err(TermError::Integrity(_))));
}

#[tokio::test]
async fn test_first_fails_second_passes() {
    let typed = coerce(&shipments(), &shipments_typing()).unwrap().table;
    let suite = ValidationSuite::builder("shipments").build();
    let report = suite
        .run(
            &typed,
            &[
                StatementConfig::new("not_null", Location::column("weight")),
                StatementConfig::new("unique", Location::column("id")),
            ],
        )
        .await
        .unwrap();

    assert!(!report.passed);
    assert_eq!(report.entries.len(), 2);
    assert!(!report.entries[0].passed());
    assert!(report.entries[1].passed());
    assert_eq!(report.entries[0].statement_type, "not_null");
    assert_eq!(report.entries[1].location, Location::column("id"));
}

#[tokio::test]
async fn test_scope_mismatch_before_evaluation() {
    let typed = coerce(&shipments(), &shipments_typing()).unwrap().table;
    let suite = ValidationSuite::builder("shipments").build();
    let err = suite
        .run(&typed, &[StatementConfig::new("unique", Location::Table)])
        .await
        .unwrap_err();
    assert!(matches!(err.root(), TermError::ScopeMismatch { .. }));

    let err = suite
        .run(
            &typed,
            &[StatementConfig::new("row_count", Location::column("id"))],
        )
        .await
        .unwrap_err();
    assert!(matches!(err.root(), TermError::ScopeMismatch { .. }));
}

#[tokio::test]
async fn test_unexpected_option_keys_are_named() {
    let typed = coerce(&shipments(), &shipments_typing()).unwrap().table;
    let suite = ValidationSuite::builder("shipments").build();
    let config = StatementConfig::new("not_null", Location::column("id"))
        .with_option("at_least_%", 90)
        .with_option("treshold", 1)
        .with_option("colour", "red");
    let err = suite.run(&typed, &[config]).await.unwrap_err();

    match err.root() {
        TermError::UnexpectedParameters {
            unexpected,
            accepted,
            ..
        } => {
            assert_eq!(unexpected, &vec!["treshold".to_string(), "colour".to_string()]);
            assert!(accepted.contains(&"location".to_string()));
            assert!(accepted.contains(&"multicolumn_logic".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_statement_report_shape_and_idempotence() {
    let typed = coerce(&shipments(), &shipments_typing()).unwrap().table;
    let registry = StatementRegistry::with_builtins();
    let contain = registry.resolve("contain").unwrap();
    let statement = contain
        .construct(
            &StatementOptions::new()
                .with("rule", "only")
                .with("values", json!(["BR", "US"])),
        )
        .unwrap();
    let slice = typed.project(&[2]).unwrap();

    let first = statement.evaluate(&slice).await.unwrap();
    let second = statement.evaluate(&slice).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(statement.result(&first.detail), first.result);

    let value = serde_json::to_value(&first).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["detail", "result"]);
    assert_eq!(value["detail"]["unexpected_values"], json!(["DE"]));
}

#[tokio::test]
async fn test_document_from_json() {
    let document = ValidationDocument::from_json(
        r#"{
            "name": "shipments",
            "statements": [
                {"type": "row_count", "severity": "error", "location": "table", "min": 1, "max": 10},
                {"type": "contain", "location": ["country"], "rule": "all", "values": ["BR", "US"]},
                {"type": "column_expression", "severity": "info", "location": ["weight"],
                 "expressions": "weight > 10", "at_least_%": 90}
            ]
        }"#,
    )
    .unwrap();
    let typing = TypingOptions::from_json(
        r#"{
            "id": {"type": "int64", "unique": true},
            "weight": {"type": "float64", "nullable": true, "thousands_sep": ".", "decimal_sep": ","},
            "shipped": {"type": "date"}
        }"#,
    )
    .unwrap();

    let typed = coerce(&shipments(), &typing).unwrap().table;
    let report = term_assay::core::validate(&typed, &document).await.unwrap();
    assert_eq!(report.suite_name, "shipments");
    assert_eq!(report.entries.len(), 3);
    assert!(report.entries[0].passed());
    assert!(report.entries[1].passed());
    assert!(!report.entries[2].passed());
    assert_eq!(report.entries[2].report.detail["valid_rows"], 2);
    assert!(!report.passed);

    let suite = ValidationSuite::builder("shipments")
        .aggregation(AggregationRule::AtLeast(Level::Warning))
        .build();
    let report = suite.run_document(&typed, &document).await.unwrap();
    assert!(report.passed);
    assert!(report.raise_for(Level::Info).is_err());
}

#[tokio::test]
async fn test_delimited_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "id;weight;country;shipped").unwrap();
    writeln!(file, "1;1.234,5;BR;2024-01-02").unwrap();
    writeln!(file, "2;12,0;BR;2024-01-03").unwrap();
    writeln!(file, "2;;US;2024-01-04").unwrap();
    file.flush().unwrap();

    let options = DelimitedOptions::default().with_delimiter(b';');
    let coerced = data_reader(file.path(), &options, &shipments_typing()).unwrap();
    assert_eq!(coerced.table.num_rows(), 3);
    assert_eq!(coerced.violations.len(), 1);
    assert!(matches!(
        coerced.violations[0].kind,
        ViolationKind::Duplicate { first_row: 1 }
    ));

    let weight = coerced.table.column(1).as_primitive::<Float64Type>();
    assert_eq!(weight.value(0), 1234.5);
    assert!(weight.is_null(2));
}

#[derive(Debug)]
struct MaxLength;

#[derive(Debug)]
struct MaxLengthStatement {
    limit: u64,
}

impl StatementType for MaxLength {
    fn name(&self) -> &str {
        "max_length"
    }

    fn expected_parameters(&self) -> &[&'static str] {
        &["limit"]
    }

    fn build(&self, options: &StatementOptions) -> Result<Box<dyn Statement>> {
        let limit = options
            .optional_u64("limit")?
            .ok_or_else(|| TermError::configuration("missing required option 'limit'"))?;
        Ok(Box::new(MaxLengthStatement { limit }))
    }
}

#[async_trait]
impl Statement for MaxLengthStatement {
    fn name(&self) -> &str {
        "max_length"
    }

    async fn report(&self, slice: &RecordBatch) -> Result<Detail> {
        let longest = slice
            .columns()
            .iter()
            .filter(|c| c.data_type() == &DataType::Utf8)
            .flat_map(|c| c.as_string::<i32>().iter().flatten().map(str::len).collect::<Vec<_>>())
            .max()
            .unwrap_or(0);
        let mut detail = Detail::new();
        detail.insert("longest".to_string(), Value::from(longest));
        Ok(detail)
    }

    fn result(&self, detail: &Detail) -> bool {
        detail["longest"].as_u64().is_some_and(|n| n <= self.limit)
    }
}

#[tokio::test]
async fn test_custom_statement_type() {
    let mut registry = StatementRegistry::with_builtins();
    registry.register_type(MaxLength).unwrap();
    let suite = ValidationSuite::builder("custom")
        .registry(Arc::new(registry))
        .build();

    let table = raw(vec![("code", vec!["ab", "abcd"])]);
    let report = suite
        .run(
            &table,
            &[
                StatementConfig::new("max_length", Location::column("code")).with_option("limit", 4),
                StatementConfig::new("max_length", Location::column("code")).with_option("limit", 3),
            ],
        )
        .await
        .unwrap();
    assert!(report.entries[0].passed());
    assert!(!report.entries[1].passed());
    assert_eq!(report.entries[1].report.detail["longest"], 4);
}

#[test]
fn test_collision_policies() {
    let mut overriding = StatementRegistry::with_builtins();
    overriding
        .register("unique", Arc::new(MaxLength))
        .unwrap();
    assert_eq!(overriding.resolve("unique").unwrap().name(), "max_length");

    let mut rejecting =
        StatementRegistry::with_builtins().with_collision_policy(CollisionPolicy::Reject);
    let err = rejecting
        .register("unique", Arc::new(MaxLength))
        .unwrap_err();
    assert!(matches!(err, TermError::DuplicateStatementType { .. }));
    assert_eq!(rejecting.resolve("unique").unwrap().name(), "unique");
}

#[tokio::test]
async fn test_continue_on_error_keeps_going() {
    let typed = coerce(&shipments(), &shipments_typing()).unwrap().table;
    let suite = ValidationSuite::builder("shipments")
        .continue_on_error()
        .build();
    let report = suite
        .run(
            &typed,
            &[
                StatementConfig::new("not_null", Location::column("missing")),
                StatementConfig::new("row_count", Location::Table).with_option("min", 4),
            ],
        )
        .await
        .unwrap();
    assert!(report.entries[0].errored());
    assert!(report.entries[0].report.detail["error"]
        .as_str()
        .unwrap()
        .contains("missing"));
    assert!(report.entries[1].passed());
    assert!(!report.passed);

    let rendered = report.to_human().unwrap();
    assert!(rendered.contains("Errored: 1"));
}
