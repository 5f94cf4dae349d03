//! Schema input types.
//!
//! These mirror the JSON schema document: a mapping from column name to the
//! parameters describing that column. Nothing here is validated beyond what
//! serde enforces; expectation formation does the semantic checks.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A full expectation schema, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub columns: BTreeMap<String, ColumnSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the spec for a column.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, spec: ColumnSpec) -> Self {
        self.columns.insert(name.into(), spec);
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names whose spec is required, in sorted order.
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name.as_str())
    }
}

/// Parameters and presence requirement for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ColumnSpec {
    pub fn new(parameters: Vec<ParameterSpec>) -> Self {
        Self {
            parameters,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// One raw parameter entry, as written in the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub value: RawValue,
    #[serde(default)]
    pub soft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ParameterArgs>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            soft: false,
            args: None,
        }
    }

    #[must_use]
    pub fn soft(mut self) -> Self {
        self.soft = true;
        self
    }

    #[must_use]
    pub fn with_match(mut self, mode: impl Into<String>) -> Self {
        self.args.get_or_insert_with(ParameterArgs::default).match_mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.args.get_or_insert_with(ParameterArgs::default).flags = Some(flags);
        self
    }
}

/// Auxiliary options for a parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterArgs {
    /// `full`, `partial` or `us_states`; kept as text so formation can report it.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<String>,
    /// Pattern flags using Python `re` bit values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u32>,
}

/// Untyped parameter payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Bool(value) => write!(f, "{value}"),
            RawValue::Integer(value) => write!(f, "{value}"),
            RawValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}
