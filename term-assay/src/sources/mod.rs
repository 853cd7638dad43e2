//! Raw table ingestion.
//!
//! Readers in this module produce *raw* tables: Arrow record batches whose
//! columns are all `Utf8`, ready to be typed by the
//! [`coercion`](crate::coercion) layer. Only basic delimited text is
//! supported.

mod delimited;

pub use delimited::{data_reader, read_delimited, read_delimited_from, DelimitedOptions};
