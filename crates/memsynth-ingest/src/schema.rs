//! JSON schema loading.

use std::path::Path;

use memsynth_model::Schema;

use crate::error::{IngestError, Result};

/// Reads an expectation schema from a JSON file.
///
/// The document is a mapping of column name to
/// `{"parameters": [...], "required": bool}`.
pub fn read_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let schema = parse_schema(&text).map_err(|source| IngestError::SchemaParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        columns = schema.len(),
        "Loaded expectation schema"
    );
    Ok(schema)
}

/// Parses an expectation schema from JSON text.
pub fn parse_schema(text: &str) -> std::result::Result<Schema, serde_json::Error> {
    serde_json::from_str(text)
}
