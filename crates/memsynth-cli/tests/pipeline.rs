//! Integration tests for the check and schema runs.

use std::path::{Path, PathBuf};

use memsynth_cli::pipeline::{describe_schema, run_check};
use memsynth_cli::types::CheckRequest;
use memsynth_model::{ListState, LogicalType};
use tempfile::TempDir;

const SCHEMA: &str = r#"{
    "AK_ID": {"parameters": [
        {"name": "data_type", "value": "integer"},
        {"name": "regex", "value": "[0-9]+"},
        {"name": "nullable", "value": false}
    ], "required": true},
    "Address": {"parameters": [
        {"name": "data_type", "value": "string"},
        {"name": "regex", "value": "[0-9]+ [A-Za-z ]+", "soft": true, "args": {"match": "full"}}
    ], "required": true},
    "State": {"parameters": [
        {"name": "data_type", "value": "string"},
        {"name": "regex", "value": "", "args": {"match": "us_states"}}
    ], "required": true}
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn request(table: &Path, schema: &Path, strict: bool, include_soft: bool) -> CheckRequest {
    CheckRequest {
        table: table.to_path_buf(),
        schema: schema.to_path_buf(),
        name: None,
        soft_load: false,
        strict,
        include_soft,
    }
}

#[test]
fn clean_roster_passes() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "params.json", SCHEMA);
    let table = write(
        &dir,
        "roster.csv",
        "AK_ID,Address,State\n127296,123 Main Street,FL\n5508,4500 Noble Ave,ny\n",
    );

    let outcome = run_check(&request(&table, &schema, true, false)).unwrap();
    assert!(outcome.passed);
    assert_eq!(outcome.name, "roster.csv");
    assert_eq!(outcome.condition, ListState::Success);
    assert_eq!(outcome.rows, 2);
    assert!(outcome.columns.iter().all(|c| c.present && c.hard == 0));
    assert_eq!(outcome.columns[0].data_type, LogicalType::Integer);
}

#[test]
fn soft_failures_pass_only_when_lenient() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "params.json", SCHEMA);
    let table = write(
        &dir,
        "roster.csv",
        "AK_ID,Address,State\n1,P.O. Box 1234,FL\n2,12 Elm St.,GA\n",
    );

    let strict = run_check(&request(&table, &schema, true, false)).unwrap();
    assert!(!strict.passed);
    assert_eq!(strict.condition, ListState::SoftFailure);
    assert!(strict.report.is_empty());

    let lenient = run_check(&request(&table, &schema, false, true)).unwrap();
    assert!(lenient.passed);
    assert_eq!(lenient.report.soft_count(), 2);
    assert_eq!(lenient.report.columns[0].failures.len(), 2);
}

#[test]
fn hard_failures_fail_without_error() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "params.json", SCHEMA);
    let table = write(
        &dir,
        "members.csv",
        "AK_ID,Address,State\n1,123 Main Street,Florida\n,4500 Noble Ave,FL\n",
    );

    let outcome = run_check(&request(&table, &schema, true, false)).unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.condition, ListState::Failure);
    assert_eq!(outcome.report.hard_count(), 2);

    let json = serde_json::to_value(&outcome.report).unwrap();
    assert_eq!(json["condition"], "FAILURE");
    assert_eq!(json["columns"][0]["column"], "AK_ID");
    assert_eq!(json["columns"][0]["failures"][0]["value"], serde_json::Value::Null);
}

#[test]
fn column_mismatch_is_an_error() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "params.json", SCHEMA);
    let table = write(&dir, "roster.csv", "AK_ID,Address,DERP\n1,123 Main Street,x\n");

    let err = run_check(&request(&table, &schema, true, false)).unwrap_err();
    insta::assert_snapshot!(
        format!("{err:#}").replace(&table.display().to_string(), "<TABLE>"),
        @"load membership list <TABLE>: error loading membership list 'roster.csv': missing columns: 'State' and added new columns: 'DERP'"
    );
}

#[test]
fn describe_schema_lists_expectations() {
    let dir = TempDir::new().unwrap();
    let schema = write(&dir, "params.json", SCHEMA);

    let summaries = describe_schema(&schema).unwrap();
    let columns: Vec<&str> = summaries.iter().map(|s| s.column.as_str()).collect();
    assert_eq!(columns, vec!["AK_ID", "Address", "State"]);
    assert!(!summaries[0].nullable);
    assert_eq!(summaries[1].soft_patterns, 1);
    assert_eq!(summaries[1].patterns, vec!["regex '[0-9]+ [A-Za-z ]+' (full)"]);
    assert_eq!(summaries[2].patterns, vec!["regex us_states"]);
}

#[test]
fn describe_schema_rejects_malformed_expectations() {
    let dir = TempDir::new().unwrap();
    let schema = write(
        &dir,
        "params.json",
        r#"{"AK_ID": {"parameters": [{"name": "nullable", "value": true}]}}"#,
    );
    let err = describe_schema(&schema).unwrap_err();
    assert!(format!("{err:#}").contains("there is no data_type for the column"));
}
