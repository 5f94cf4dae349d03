//! Type-safe enumerations for the expectation schema.
//!
//! Schema files carry these concepts as plain strings; parsing them once into
//! enums keeps the validation engine free of string comparisons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a parameter, taken from its `name` field in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Declared logical type of the column. Exactly one per expectation.
    DataType,
    /// Pattern the string form of every non-null cell must match.
    Regex,
    /// Whether null cells are allowed. At most one per expectation.
    Nullable,
    /// Reference to another column the values relate to.
    RelativeTo,
}

impl ParameterKind {
    /// All kinds accepted in a schema, in canonical order.
    pub const ALL: [ParameterKind; 4] = [
        ParameterKind::DataType,
        ParameterKind::Regex,
        ParameterKind::Nullable,
        ParameterKind::RelativeTo,
    ];

    /// Returns the name as it appears in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterKind::DataType => "data_type",
            ParameterKind::Regex => "regex",
            ParameterKind::Nullable => "nullable",
            ParameterKind::RelativeTo => "relative_to",
        }
    }

    /// Returns true if an expectation may hold at most one parameter of this kind.
    pub fn is_unique(&self) -> bool {
        matches!(self, ParameterKind::DataType | ParameterKind::Nullable)
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown parameter kind: {s}"))
    }
}

/// Logical column types a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    /// Free text.
    String,
    /// Opaque value, stored as text.
    Object,
    /// Whole numbers.
    Integer,
    /// Calendar dates.
    Date,
    /// True/false flags.
    Boolean,
}

impl LogicalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalType::String => "string",
            LogicalType::Object => "object",
            LogicalType::Integer => "integer",
            LogicalType::Date => "date",
            LogicalType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalType {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" => Ok(LogicalType::String),
            "object" => Ok(LogicalType::Object),
            "integer" => Ok(LogicalType::Integer),
            "date" => Ok(LogicalType::Date),
            "boolean" => Ok(LogicalType::Boolean),
            _ => Err(format!("unknown data type: {s}")),
        }
    }
}

/// How a `regex` parameter is matched against a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The pattern must match starting at the first character.
    #[default]
    Partial,
    /// The pattern must match the whole string.
    Full,
    /// The cell must be a US state or territory postal code.
    UsStates,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Partial => "partial",
            MatchMode::Full => "full",
            MatchMode::UsStates => "us_states",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "partial" => Ok(MatchMode::Partial),
            "full" => Ok(MatchMode::Full),
            "us_states" => Ok(MatchMode::UsStates),
            _ => Err(format!("unknown match mode: {s}")),
        }
    }
}

/// Overall condition of a membership list after checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListState {
    /// Not checked since the last load.
    #[default]
    Dirty,
    /// Every expectation passed.
    Success,
    /// Only soft failures were found.
    SoftFailure,
    /// At least one hard failure was found.
    Failure,
}

impl ListState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListState::Dirty => "DIRTY",
            ListState::Success => "SUCCESS",
            ListState::SoftFailure => "SOFT_FAILURE",
            ListState::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for ListState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
