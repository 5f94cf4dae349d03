use anyhow::{Context, Result};

use memsynth_cli::pipeline::{describe_schema, run_check};
use memsynth_cli::types::CheckRequest;

use crate::cli::{CheckArgs, OutputFormatArg, SchemaArgs};
use crate::summary::{print_check_summary, print_schema_table};

/// Runs `check` and prints the result. Returns whether the list passed.
pub fn run_check_command(args: &CheckArgs) -> Result<bool> {
    let request = CheckRequest {
        table: args.table.clone(),
        schema: args.schema.clone(),
        name: args.name.clone(),
        soft_load: args.soft_load,
        strict: !args.lenient,
        include_soft: args.include_soft,
    };
    let outcome = run_check(&request)?;
    match args.format {
        OutputFormatArg::Table => print_check_summary(&outcome),
        OutputFormatArg::Json => {
            let json = serde_json::to_string_pretty(&outcome).context("serialize result")?;
            println!("{json}");
        }
    }
    Ok(outcome.passed)
}

pub fn run_schema_command(args: &SchemaArgs) -> Result<bool> {
    let expectations = describe_schema(&args.schema)?;
    print_schema_table(&expectations);
    Ok(true)
}
