//! The `check` and `schema` runs, independent of argument parsing and output.

use std::path::Path;

use anyhow::{Context, Result};
use memsynth_ingest::read_schema;
use memsynth_model::ParameterKind;
use memsynth_validate::{Expectation, Session, SessionError};
use tracing::{info, info_span, warn};

use crate::types::{CheckOutcome, CheckRequest, ColumnStatus, ExpectationSummary};

/// Loads the schema and the table, then checks the list.
///
/// Hard failures are part of the outcome, not an error; errors are reserved
/// for inputs that cannot be read, formed or reconciled.
pub fn run_check(request: &CheckRequest) -> Result<CheckOutcome> {
    let mut session = match &request.name {
        Some(name) => Session::named(name.clone()),
        None => Session::new(),
    };
    let span = info_span!("check", table = %request.table.display());
    let _guard = span.enter();

    session
        .load_expectations_from_json(&request.schema)
        .with_context(|| format!("load schema {}", request.schema.display()))?;
    session
        .load_from_csv(&request.table, request.soft_load)
        .with_context(|| format!("load membership list {}", request.table.display()))?;

    let passed = match session.check_membership_list_on_parameters(request.strict) {
        Ok(passed) => passed,
        Err(SessionError::Integrity(error)) => {
            warn!(%error, "Membership list failed integrity check");
            false
        }
        Err(error) => return Err(error).context("check membership list"),
    };

    let rows = session.table().map_or(0, |df| df.height());
    let columns = session
        .expectations()
        .values()
        .map(|exp| ColumnStatus {
            column: exp.column().to_string(),
            data_type: exp.data_type(),
            required: exp.is_required(),
            present: session
                .table()
                .is_some_and(|df| df.column(exp.column()).is_ok()),
            hard: exp.fails().count(),
            soft: exp.soft_fails().count(),
        })
        .collect();

    let mut report = session.report_failures();
    if !request.include_soft {
        report.retain_hard();
    }
    info!(name = %session.name(), passed, condition = %session.condition(), "Check complete");

    Ok(CheckOutcome {
        name: session.name().to_string(),
        passed,
        condition: session.condition(),
        rows,
        columns,
        report,
    })
}

/// Forms every expectation in the schema file.
pub fn describe_schema(path: &Path) -> Result<Vec<ExpectationSummary>> {
    let schema = read_schema(path).with_context(|| format!("read schema {}", path.display()))?;
    let mut session = Session::new();
    session
        .load_expectations(&schema)
        .with_context(|| format!("form expectations from {}", path.display()))?;
    Ok(session.expectations().values().map(summarize).collect())
}

fn summarize(exp: &Expectation) -> ExpectationSummary {
    ExpectationSummary {
        column: exp.column().to_string(),
        data_type: exp.data_type(),
        required: exp.is_required(),
        nullable: exp.allows_null(),
        patterns: exp
            .parameters()
            .filter(|p| p.kind() == ParameterKind::Regex)
            .map(ToString::to_string)
            .collect(),
        soft_patterns: exp.regex().iter().filter(|p| p.is_soft()).count(),
    }
}
