//! Delimited text reader.

use crate::coercion::{CoercedTable, Coercer, TypingOptions};
use crate::prelude::*;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Cursor, ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Options for reading delimited text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelimitedOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Whether the first line holds column names (default: true)
    pub has_header: bool,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Rows per internal batch (default: 8192)
    pub batch_size: usize,
    /// Text encoding label, e.g. `utf-8` or `iso-8859-1` (default: `utf-8`)
    pub encoding: String,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            quote: b'"',
            batch_size: 8192,
            encoding: "utf-8".to_string(),
        }
    }
}

impl DelimitedOptions {
    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the input has a header line.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Sets the quote character.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the text encoding by its WHATWG label.
    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    fn resolve_encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes()).ok_or_else(|| {
            TermError::configuration(format!("unknown text encoding '{}'", self.encoding))
        })
    }

    fn format(&self) -> Format {
        Format::default()
            .with_header(self.has_header)
            .with_delimiter(self.delimiter)
            .with_quote(self.quote)
    }
}

/// Reads a delimited file into a raw table with one `Utf8` column per field.
///
/// Without a header, columns are named `column_1`, `column_2`, ...
#[instrument(skip(options), fields(path = %path.as_ref().display()))]
pub fn read_delimited(path: impl AsRef<Path>, options: &DelimitedOptions) -> Result<RecordBatch> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open delimited file '{}'", path.display()))?;
    read_delimited_from(BufReader::new(file), options)
}

/// Reads delimited text from any reader into a raw table.
///
/// The input is decoded with the configured encoding before parsing. A
/// leading byte order mark overrides the configured encoding.
pub fn read_delimited_from<R: Read>(
    mut reader: R,
    options: &DelimitedOptions,
) -> Result<RecordBatch> {
    if options.batch_size == 0 {
        return Err(TermError::configuration("batch_size must be positive"));
    }
    let encoding = options.resolve_encoding()?;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let (text, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(encoding = used.name(), "Malformed input for text encoding");
        return Err(TermError::Io(std::io::Error::new(
            ErrorKind::InvalidData,
            format!("input is not valid {}", used.name()),
        )));
    }
    debug!(encoding = used.name(), bytes = bytes.len(), "Decoded delimited input");

    let mut reader = Cursor::new(text.as_bytes());
    let (inferred, lines) = options.format().infer_schema(&mut reader, None)?;
    debug!(columns = inferred.fields().len(), lines, "Inferred delimited layout");

    // Every field is read as text; typing is the coercion layer's job.
    let schema = Arc::new(Schema::new(
        inferred
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    reader.set_position(0);
    let csv = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(options.format())
        .with_batch_size(options.batch_size)
        .build(reader)?;

    let batches = csv.collect::<std::result::Result<Vec<_>, _>>()?;
    let table = concat_batches(&schema, &batches)?;
    info!(
        table.rows = table.num_rows(),
        table.columns = table.num_columns(),
        "Read delimited table"
    );
    Ok(table)
}

/// Reads a delimited file and coerces it with the given typing options.
///
/// Uses lenient coercion; violations are returned alongside the typed table.
pub fn data_reader(
    path: impl AsRef<Path>,
    options: &DelimitedOptions,
    typing: &TypingOptions,
) -> Result<CoercedTable> {
    let raw = read_delimited(path, options)?;
    Coercer::new().coerce(&raw, typing)
}
