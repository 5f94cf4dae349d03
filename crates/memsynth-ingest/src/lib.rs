//! Membership data ingestion.
//!
//! This crate reads the two inputs of a validation run:
//!
//! - **Schemas**: JSON expectation documents into [`memsynth_model::Schema`]
//! - **Tables**: CSV membership lists into Polars DataFrames of text columns
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use memsynth_ingest::{read_csv_table, read_schema};
//!
//! let schema = read_schema(Path::new("params.json"))?;
//! let df = read_csv_table(Path::new("roster.csv"))?;
//! ```

mod error;
mod schema;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Schema Reading ===
pub use schema::{parse_schema, read_schema};

// === CSV Reading ===
pub use table::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_table,
    validate_encoding,
};
