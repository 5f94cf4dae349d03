use std::path::PathBuf;

use memsynth_model::{ListState, LogicalType};
use memsynth_validate::FailureReport;
use serde::Serialize;

/// Inputs of one `check` run.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub table: PathBuf,
    pub schema: PathBuf,
    pub name: Option<String>,
    pub soft_load: bool,
    pub strict: bool,
    pub include_soft: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub condition: ListState,
    pub rows: usize,
    pub columns: Vec<ColumnStatus>,
    pub report: FailureReport,
}

/// Per-column line of the check summary.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStatus {
    pub column: String,
    pub data_type: LogicalType,
    pub required: bool,
    pub present: bool,
    pub hard: usize,
    pub soft: usize,
}

/// One formed expectation, as listed by the `schema` command.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectationSummary {
    pub column: String,
    pub data_type: LogicalType,
    pub required: bool,
    pub nullable: bool,
    pub patterns: Vec<String>,
    pub soft_patterns: usize,
}
