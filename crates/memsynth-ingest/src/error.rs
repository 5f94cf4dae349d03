//! Error types for schema and table ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading schemas and membership tables.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// File uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Schema Errors ===
    /// Schema document is not valid JSON or has the wrong shape.
    #[error("failed to parse schema {path}: {source}")]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// A header cell is blank.
    #[error("CSV file {path} has an empty column name")]
    EmptyColumnName { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

impl IngestError {
    /// Map an I/O error for `path`, distinguishing a missing file.
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}
