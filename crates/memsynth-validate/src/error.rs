//! Error types for the expectation engine.
//!
//! - [`FormationError`]: the schema is malformed; raised while forming an expectation.
//! - [`LoadError`]: a table could not be accepted (column mismatch or type coercion).
//! - [`IntegrityError`]: a strict check found hard failures.
//! - [`SessionError`]: umbrella type returned by [`crate::Session`] operations.

use std::collections::BTreeSet;
use std::fmt;

use memsynth_ingest::IngestError;
use memsynth_model::{LogicalType, ParameterKind};
use thiserror::Error;

/// The schema for a column cannot be turned into an expectation.
#[derive(Debug, Error)]
pub enum FormationError {
    /// Parameter name outside the accepted kinds.
    #[error(
        "error forming expectation for '{column}': {name} is not a recognized parameter, \
         expected one of data_type, regex, nullable, relative_to"
    )]
    UnknownParameter { column: String, name: String },

    /// A unique kind appeared twice.
    #[error("error forming expectation for '{column}': has multiple unique parameters '{kind}'")]
    MultipleUniqueParameters { column: String, kind: ParameterKind },

    /// No `data_type` parameter was given.
    #[error("error forming expectation for '{column}': there is no data_type for the column")]
    MissingDataType { column: String },

    /// The payload does not fit the parameter kind.
    #[error("error forming expectation for '{column}': invalid {kind} value '{value}': {reason}")]
    InvalidValue {
        column: String,
        kind: ParameterKind,
        value: String,
        reason: String,
    },

    /// The pattern does not compile.
    #[error("error forming expectation for '{column}': invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        column: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Pattern flags outside the supported set.
    #[error("error forming expectation for '{column}': unsupported pattern flags {flags}")]
    UnsupportedFlags { column: String, flags: u32 },
}

/// Why the table's column set does not reconcile against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMismatch {
    /// No required column was found at all.
    NoneMatch,
    /// Every required column is present, plus unexpected ones.
    Added { added: BTreeSet<String> },
    /// Some required columns are absent and nothing unexpected was found.
    Missing { missing: BTreeSet<String> },
    /// Required columns are absent and unexpected ones are present.
    MissingAndAdded {
        missing: BTreeSet<String>,
        added: BTreeSet<String>,
    },
}

impl fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnMismatch::NoneMatch => {
                f.write_str("none of the columns match, is this the right document?")
            }
            ColumnMismatch::Added { added } => {
                write!(f, "added new columns: {}", quoted_list(added))
            }
            ColumnMismatch::Missing { missing } => {
                write!(f, "missing columns: {}", quoted_list(missing))
            }
            ColumnMismatch::MissingAndAdded { missing, added } => write!(
                f,
                "missing columns: {} and added new columns: {}",
                quoted_list(missing),
                quoted_list(added)
            ),
        }
    }
}

fn quoted_list(names: &BTreeSet<String>) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A membership table could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Column set does not match the schema.
    #[error("error loading membership list '{name}': {mismatch}")]
    ColumnMismatch {
        name: String,
        mismatch: ColumnMismatch,
    },

    /// A cell could not be converted to the declared type.
    #[error("cannot convert column '{column}' row {row} value '{value}' to {target}")]
    Coercion {
        column: String,
        row: usize,
        value: String,
        target: LogicalType,
    },

    /// The table file could not be read.
    #[error("error loading membership list: {0}")]
    Ingest(#[from] IngestError),

    /// Polars DataFrame operation error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl LoadError {
    /// The reconciliation diagnosis, if this is a column mismatch.
    pub fn mismatch(&self) -> Option<&ColumnMismatch> {
        match self {
            LoadError::ColumnMismatch { mismatch, .. } => Some(mismatch),
            _ => None,
        }
    }
}

/// A strict check found hard failures.
#[derive(Debug, Clone, Error)]
#[error(
    "membership list '{name}' has {hard_failures} hard failures in columns: {}",
    .columns.join(", ")
)]
pub struct IntegrityError {
    pub name: String,
    pub columns: Vec<String>,
    pub hard_failures: usize,
}

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Formation(#[from] FormationError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A check was requested before any table was loaded.
    #[error("no membership list loaded in '{name}'")]
    NotLoaded { name: String },
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn mismatch_messages_are_sorted_and_quoted() {
        let mismatch = ColumnMismatch::MissingAndAdded {
            missing: set(&["Zip", "DSA_ID"]),
            added: set(&["DERP"]),
        };
        insta::assert_snapshot!(
            mismatch.to_string(),
            @"missing columns: 'DSA_ID', 'Zip' and added new columns: 'DERP'"
        );
    }

    #[test]
    fn multiple_unique_message() {
        let err = FormationError::MultipleUniqueParameters {
            column: "AK_ID".into(),
            kind: ParameterKind::DataType,
        };
        assert!(err.to_string().contains("multiple unique parameters"));
        assert!(err.to_string().contains("AK_ID"));
    }

    #[test]
    fn integrity_error_lists_columns() {
        let err = IntegrityError {
            name: "roster.csv".into(),
            columns: vec!["AK_ID".into(), "Zip".into()],
            hard_failures: 3,
        };
        assert_eq!(
            err.to_string(),
            "membership list 'roster.csv' has 3 hard failures in columns: AK_ID, Zip"
        );
    }
}
