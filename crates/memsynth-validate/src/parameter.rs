//! Compiled validation parameters.
//!
//! A [`Parameter`] is the formed version of a schema [`ParameterSpec`]: its
//! kind is resolved, its payload typed, and `regex` patterns compiled and
//! anchored for their match mode. Parameters are immutable once built.

use std::fmt;

use memsynth_model::{LogicalType, MatchMode, ParameterKind, ParameterSpec, RawValue};
use regex::{Regex, RegexBuilder};

use crate::error::FormationError;
use crate::states::US_STATES_REGEX;

/// Pattern flag bits, numbered like Python's `re` module.
pub mod flags {
    pub const IGNORECASE: u32 = 2;
    pub const MULTILINE: u32 = 8;
    pub const DOTALL: u32 = 16;
    pub const UNICODE: u32 = 32;
    pub const VERBOSE: u32 = 64;

    pub const SUPPORTED: u32 = IGNORECASE | MULTILINE | DOTALL | UNICODE | VERBOSE;
}

/// A single formed constraint on a column.
#[derive(Debug, Clone)]
pub struct Parameter {
    kind: ParameterKind,
    value: ParameterValue,
    soft: bool,
}

/// Typed payload of a parameter.
#[derive(Debug, Clone)]
pub enum ParameterValue {
    DataType(LogicalType),
    Pattern(Pattern),
    Nullable(bool),
    /// Name of the column this one relates to.
    RelativeTo(String),
}

/// A compiled, anchored `regex` parameter.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    mode: MatchMode,
    flags: u32,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source` anchored at the start, and at the end too for
    /// [`MatchMode::Full`].
    pub fn compile(source: &str, mode: MatchMode, bits: u32) -> Result<Self, regex::Error> {
        // Verbose patterns may end in a comment, which would swallow the closing group.
        let body = if bits & flags::VERBOSE != 0 {
            format!("{source}\n")
        } else {
            source.to_string()
        };
        let anchored = match mode {
            MatchMode::Full => format!(r"\A(?:{body})\z"),
            MatchMode::Partial | MatchMode::UsStates => format!(r"\A(?:{body})"),
        };
        let anchored = RegexBuilder::new(&anchored)
            .case_insensitive(bits & flags::IGNORECASE != 0)
            .multi_line(bits & flags::MULTILINE != 0)
            .dot_matches_new_line(bits & flags::DOTALL != 0)
            .ignore_whitespace(bits & flags::VERBOSE != 0)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            mode,
            flags: bits,
            anchored,
        })
    }

    /// Evaluates the pattern against the string form of a cell.
    ///
    /// `us_states` ignores the configured pattern and looks the value up in
    /// the postal code table instead.
    pub fn is_match(&self, text: &str) -> bool {
        match self.mode {
            MatchMode::UsStates => US_STATES_REGEX.is_match(text),
            MatchMode::Partial | MatchMode::Full => self.anchored.is_match(text),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }
}

impl Parameter {
    /// Forms a parameter for `column` from its schema entry.
    pub fn from_spec(column: &str, spec: &ParameterSpec) -> Result<Self, FormationError> {
        let kind: ParameterKind = spec
            .name
            .parse()
            .map_err(|_| FormationError::UnknownParameter {
                column: column.to_string(),
                name: spec.name.clone(),
            })?;

        let value = match kind {
            ParameterKind::DataType => {
                let text = expect_text(column, kind, &spec.value)?;
                let data_type = text
                    .parse()
                    .map_err(|reason| FormationError::InvalidValue {
                        column: column.to_string(),
                        kind,
                        value: text.to_string(),
                        reason,
                    })?;
                ParameterValue::DataType(data_type)
            }
            ParameterKind::Nullable => {
                let nullable = spec
                    .value
                    .as_bool()
                    .ok_or_else(|| FormationError::InvalidValue {
                        column: column.to_string(),
                        kind,
                        value: spec.value.to_string(),
                        reason: "expected a boolean".to_string(),
                    })?;
                ParameterValue::Nullable(nullable)
            }
            ParameterKind::Regex => ParameterValue::Pattern(compile_pattern(column, spec)?),
            ParameterKind::RelativeTo => {
                ParameterValue::RelativeTo(expect_text(column, kind, &spec.value)?.to_string())
            }
        };

        tracing::debug!(column, parameter = %kind, soft = spec.soft, "Formed parameter");
        Ok(Self {
            kind,
            value,
            soft: spec.soft,
        })
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    pub fn is_soft(&self) -> bool {
        self.soft
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        match &self.value {
            ParameterValue::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn data_type(&self) -> Option<LogicalType> {
        match self.value {
            ParameterValue::DataType(data_type) => Some(data_type),
            _ => None,
        }
    }

    pub fn nullable(&self) -> Option<bool> {
        match self.value {
            ParameterValue::Nullable(nullable) => Some(nullable),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ParameterValue::DataType(data_type) => write!(f, "data_type={data_type}"),
            ParameterValue::Nullable(nullable) => write!(f, "nullable={nullable}"),
            ParameterValue::RelativeTo(column) => write!(f, "relative_to={column}"),
            ParameterValue::Pattern(pattern) => match pattern.mode {
                MatchMode::UsStates => f.write_str("regex us_states"),
                mode => write!(f, "regex '{}' ({mode})", pattern.source),
            },
        }
    }
}

fn expect_text<'a>(
    column: &str,
    kind: ParameterKind,
    value: &'a RawValue,
) -> Result<&'a str, FormationError> {
    value.as_text().ok_or_else(|| FormationError::InvalidValue {
        column: column.to_string(),
        kind,
        value: value.to_string(),
        reason: "expected text".to_string(),
    })
}

fn compile_pattern(column: &str, spec: &ParameterSpec) -> Result<Pattern, FormationError> {
    let source = expect_text(column, ParameterKind::Regex, &spec.value)?;
    let args = spec.args.clone().unwrap_or_default();

    let mode = match args.match_mode.as_deref() {
        None => MatchMode::Partial,
        Some(text) => text.parse().unwrap_or_else(|_| {
            tracing::warn!(column, mode = text, "Unknown match mode, using partial match");
            MatchMode::Partial
        }),
    };

    let bits = args.flags.unwrap_or(0);
    if bits & !flags::SUPPORTED != 0 {
        return Err(FormationError::UnsupportedFlags {
            column: column.to_string(),
            flags: bits,
        });
    }

    tracing::debug!(column, pattern = source, %mode, "Compiling regular expression");
    Pattern::compile(source, mode, bits).map_err(|source_err| FormationError::InvalidPattern {
        column: column.to_string(),
        pattern: source.to_string(),
        source: source_err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex_param(source: &str, mode: Option<&str>) -> Parameter {
        let mut spec = ParameterSpec::new("regex", source);
        if let Some(mode) = mode {
            spec = spec.with_match(mode);
        }
        Parameter::from_spec("col", &spec).unwrap()
    }

    #[test]
    fn partial_match_is_anchored_at_start_only() {
        let param = regex_param("[0-9]+", None);
        let pattern = param.pattern().unwrap();
        assert!(pattern.is_match("12345"));
        assert!(pattern.is_match("127296abc"));
        assert!(!pattern.is_match("d%sq+`1"));
        assert!(!pattern.is_match("De32"));
    }

    #[test]
    fn full_match_requires_whole_string() {
        let param = regex_param("[0-9]+", Some("full"));
        let pattern = param.pattern().unwrap();
        assert!(pattern.is_match("12345"));
        assert!(!pattern.is_match("12345a"));
    }

    #[test]
    fn full_match_tries_every_alternative() {
        let pattern = regex_param("a|ab", Some("full"));
        assert!(pattern.pattern().unwrap().is_match("ab"));
    }

    #[test]
    fn us_states_ignores_own_pattern() {
        let param = regex_param("[0-9]+", Some("US_STATES"));
        let pattern = param.pattern().unwrap();
        assert!(pattern.is_match("FL"));
        assert!(pattern.is_match("pr"));
        assert!(!pattern.is_match("123"));
        assert!(!pattern.is_match("FLA"));
    }

    #[test]
    fn unknown_match_mode_falls_back_to_partial() {
        let param = regex_param("[0-9]+", Some("fuzzy"));
        assert_eq!(param.pattern().unwrap().mode(), MatchMode::Partial);
    }

    #[test]
    fn ignorecase_flag_applies() {
        let spec = ParameterSpec::new("regex", "[a-z]+")
            .with_match("full")
            .with_flags(flags::IGNORECASE);
        let param = Parameter::from_spec("col", &spec).unwrap();
        assert!(param.pattern().unwrap().is_match("NOBLE"));
    }

    #[test]
    fn verbose_flag_tolerates_trailing_comment() {
        let spec = ParameterSpec::new("regex", "[0-9]+  # digits")
            .with_match("full")
            .with_flags(flags::VERBOSE);
        let param = Parameter::from_spec("col", &spec).unwrap();
        assert!(param.pattern().unwrap().is_match("42"));
    }

    #[test]
    fn unsupported_flags_are_rejected() {
        let spec = ParameterSpec::new("regex", "x").with_flags(256);
        let err = Parameter::from_spec("col", &spec).unwrap_err();
        assert!(matches!(err, FormationError::UnsupportedFlags { flags: 256, .. }));
    }

    #[test]
    fn invalid_pattern_is_a_formation_error() {
        let spec = ParameterSpec::new("regex", "[0-9");
        let err = Parameter::from_spec("col", &spec).unwrap_err();
        assert!(matches!(err, FormationError::InvalidPattern { .. }));
    }

    #[test]
    fn value_types_are_checked() {
        let err = Parameter::from_spec("col", &ParameterSpec::new("nullable", "no")).unwrap_err();
        assert!(matches!(
            err,
            FormationError::InvalidValue {
                kind: ParameterKind::Nullable,
                ..
            }
        ));

        let err =
            Parameter::from_spec("col", &ParameterSpec::new("data_type", "int64")).unwrap_err();
        assert!(matches!(
            err,
            FormationError::InvalidValue {
                kind: ParameterKind::DataType,
                ..
            }
        ));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err =
            Parameter::from_spec("AK_ID", &ParameterSpec::new("bad_param", "not_good")).unwrap_err();
        assert!(err.to_string().contains("bad_param is not a recognized parameter"));
    }

    #[test]
    fn display_names_the_rule() {
        assert_eq!(regex_param("[0-9]+", Some("full")).to_string(), "regex '[0-9]+' (full)");
        let nullable = Parameter::from_spec("c", &ParameterSpec::new("nullable", false)).unwrap();
        assert_eq!(nullable.to_string(), "nullable=false");
    }
}
