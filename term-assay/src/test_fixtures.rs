//! Common test fixtures for coercion and validation scenarios.
//!
//! These helpers build small in-memory tables. They panic on invalid input,
//! which only happens when a fixture itself is written incorrectly.

use crate::coercion::{ColumnDescriptor, ColumnType, TypingOptions};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Builds a raw table of nullable `Utf8` columns.
///
/// ```rust
/// use term_assay::test_fixtures::raw_table;
///
/// let table = raw_table(vec![("id", vec![Some("1"), None])]);
/// assert_eq!(table.num_rows(), 2);
/// ```
pub fn raw_table(columns: Vec<(&str, Vec<Option<&str>>)>) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(StringArray::from(values)) as ArrayRef)
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .expect("raw fixture columns must have equal lengths")
}

/// A typed order table.
///
/// | order_id | customer | amount | status   |
/// |----------|----------|--------|----------|
/// | 1        | alice    | 10.0   | new      |
/// | 2        | bob      | 25.5   | paid     |
/// | 3        | null     | 7.25   | paid     |
/// | 4        | dave     | 100.0  | shipped  |
/// | 5        | erin     | 42.0   | refunded |
/// | 6        | frank    | 13.75  | paid     |
///
/// `order_id` is complete and unique; `customer` has one null.
pub fn orders_table() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Int64, true),
        Field::new("customer", DataType::Utf8, true),
        Field::new("amount", DataType::Float64, true),
        Field::new("status", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4, 5, 6])),
            Arc::new(StringArray::from(vec![
                Some("alice"),
                Some("bob"),
                None,
                Some("dave"),
                Some("erin"),
                Some("frank"),
            ])),
            Arc::new(Float64Array::from(vec![10.0, 25.5, 7.25, 100.0, 42.0, 13.75])),
            Arc::new(StringArray::from(vec![
                "new", "paid", "paid", "shipped", "refunded", "paid",
            ])),
        ],
    )
    .expect("orders fixture must be well-formed")
}

/// The raw text form of [`orders_table`], as read from a delimited file.
pub fn raw_orders() -> RecordBatch {
    raw_table(vec![
        ("order_id", vec![Some("1"), Some("2"), Some("3"), Some("4"), Some("5"), Some("6")]),
        (
            "customer",
            vec![Some("alice"), Some("bob"), Some(""), Some("dave"), Some("erin"), Some("frank")],
        ),
        (
            "amount",
            vec![Some("10"), Some("25.5"), Some("7.25"), Some("100"), Some("42"), Some("13.75")],
        ),
        (
            "status",
            vec![
                Some("new"),
                Some("paid"),
                Some("paid"),
                Some("shipped"),
                Some("refunded"),
                Some("paid"),
            ],
        ),
    ])
}

/// Column descriptors turning [`raw_orders`] into [`orders_table`].
pub fn orders_typing() -> TypingOptions {
    TypingOptions::new()
        .with_column(
            "order_id",
            ColumnDescriptor::new(ColumnType::Int64).with_unique(true),
        )
        .with_column(
            "customer",
            ColumnDescriptor::new(ColumnType::String).with_nullable(true),
        )
        .with_column("amount", ColumnDescriptor::new(ColumnType::Float64))
        .with_column("status", ColumnDescriptor::new(ColumnType::String))
}
