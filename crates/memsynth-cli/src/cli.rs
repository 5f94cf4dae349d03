//! CLI argument definitions for the membership list validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "memsynth",
    version,
    about = "MemSynth - Validate membership rosters against a column schema",
    long_about = "Validate a membership roster against a JSON schema of per-column expectations.\n\n\
                  Checks data types, nullability and hard or soft patterns, and diagnoses\n\
                  missing or unexpected columns."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a CSV membership list against a schema.
    Check(CheckArgs),

    /// Form every expectation of a schema and list them.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Path to the membership list (CSV with a header row).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Path to the JSON schema of column expectations.
    #[arg(long = "schema", short = 's', value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Accept the list when it has columns the schema does not know about.
    #[arg(long = "soft-load")]
    pub soft_load: bool,

    /// Pass lists that only have soft failures.
    ///
    /// By default any failure fails the check. In lenient mode soft
    /// failures are reported but the exit code stays 0.
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Include soft failures in the failure listing.
    #[arg(long = "include-soft")]
    pub include_soft: bool,

    /// Output format for the result.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Name for the list in messages (default: the table file name).
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Path to the JSON schema of column expectations.
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
