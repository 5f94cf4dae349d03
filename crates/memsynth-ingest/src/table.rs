//! Membership table loading from CSV.
//!
//! Every column is read as text. Typing is decided later by the expectation
//! schema, so the reader never guesses a dtype from sample rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

/// Maximum file size for CSV loading (500 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Check file size against the default limit.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Rejects UTF-16 files by their byte order mark.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| IngestError::io(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file
        .read(&mut buffer)
        .map_err(|e| IngestError::io(path, e))?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a membership list CSV into a DataFrame of text columns.
///
/// Empty fields become nulls. Header names are kept as written.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    check_file_size(path)?;
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    validate_column_names(&df, path)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Read membership table"
    );
    Ok(df)
}

fn validate_column_names(df: &DataFrame, path: &Path) -> Result<()> {
    if df.get_column_names().iter().any(|name| name.trim().is_empty()) {
        return Err(IngestError::EmptyColumnName {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{AnyValue, DataType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table_keeps_text() {
        let file = create_temp_csv("AK_ID,first_name\n127296,Rosa\n5508,Emma\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let ak_id = df.column("AK_ID").unwrap();
        assert_eq!(ak_id.dtype(), &DataType::String);
        assert_eq!(ak_id.get(0).unwrap(), AnyValue::String("127296"));
    }

    #[test]
    fn test_read_csv_table_empty_field_is_null() {
        let file = create_temp_csv("AK_ID,DSA_ID\n1,\n2,117722\n");
        let df = read_csv_table(file.path()).unwrap();

        assert_eq!(df.column("DSA_ID").unwrap().null_count(), 1);
    }

    #[test]
    fn test_check_file_size_limit() {
        let file = create_temp_csv("A,B\n1,2\n");
        assert!(check_file_size_with_limit(file.path(), 1024).is_ok());
        let err = check_file_size_with_limit(file.path(), 2).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { .. }));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'A', 0x00]).unwrap();
        let err = validate_encoding(file.path()).unwrap_err();
        assert!(matches!(
            err,
            IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            }
        ));
    }

    #[test]
    fn test_read_csv_table_missing_file() {
        let err = read_csv_table(Path::new("/nonexistent/list.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }
}
