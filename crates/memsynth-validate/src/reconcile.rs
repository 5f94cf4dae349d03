//! Column-set reconciliation between a schema and a table.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ColumnMismatch;
use crate::expectation::Expectation;

/// Compares the table's columns against the required expectations.
///
/// Columns whose expectation is not required are ignored on both sides.
/// With `soft_load`, extra columns are accepted as long as every required
/// column is present.
pub fn verify_format<S: AsRef<str>>(
    expectations: &BTreeMap<String, Expectation>,
    columns: &[S],
    soft_load: bool,
) -> Result<(), ColumnMismatch> {
    let expected: BTreeSet<&str> = expectations
        .values()
        .filter(|exp| exp.is_required())
        .map(Expectation::column)
        .collect();
    let not_required: BTreeSet<&str> = expectations
        .values()
        .filter(|exp| !exp.is_required())
        .map(Expectation::column)
        .collect();
    let actual: BTreeSet<&str> = columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !not_required.contains(name))
        .collect();

    if expected == actual {
        tracing::debug!(columns = actual.len(), "Column set matches schema");
        return Ok(());
    }

    let missing: BTreeSet<String> = expected
        .difference(&actual)
        .map(ToString::to_string)
        .collect();
    let added: BTreeSet<String> = actual
        .difference(&expected)
        .map(ToString::to_string)
        .collect();

    let mismatch = if expected.is_disjoint(&actual) {
        ColumnMismatch::NoneMatch
    } else if missing.is_empty() {
        if soft_load {
            tracing::warn!(added = ?added, "Accepting table with added columns");
            return Ok(());
        }
        ColumnMismatch::Added { added }
    } else if added.is_empty() {
        ColumnMismatch::Missing { missing }
    } else {
        ColumnMismatch::MissingAndAdded { missing, added }
    };
    Err(mismatch)
}
