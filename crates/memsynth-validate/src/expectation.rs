//! Per-column expectations and their cell checks.
//!
//! An [`Expectation`] bundles the formed parameters of one column. Checking a
//! column walks its rows once; every registered cell check whose kind is
//! present on the expectation contributes an [`Outcome`] to a per-row
//! accumulator, and the accumulator yields at most one [`Failure`] per row.

use std::collections::BTreeSet;
use std::fmt;

use memsynth_model::{ColumnSpec, LogicalType, ParameterKind, ParameterSpec};
use polars::prelude::{AnyValue, Column};

use crate::cell::cell_text;
use crate::error::FormationError;
use crate::parameter::{Parameter, ParameterValue};

/// Result of one parameter evaluated against one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Pass,
    Fail,
    /// The parameter has nothing to say about this cell.
    Inconclusive,
}

type CellCheck = for<'a> fn(&'a Expectation, Option<&str>, &mut RowAccumulator<'a>);

/// Cell checks by parameter kind. Kinds without an entry (`data_type`,
/// `relative_to`) are not evaluated per cell.
const CELL_CHECKS: &[(ParameterKind, CellCheck)] = &[
    (ParameterKind::Nullable, check_nullable),
    (ParameterKind::Regex, check_regex),
];

/// One failing row.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Zero-based row index.
    pub line: usize,
    /// Parameters that failed on this row, in evaluation order.
    pub parameters: Vec<Parameter>,
    /// The offending cell as text, `None` for null.
    pub data: Option<String>,
}

impl Failure {
    /// A failure is soft only when every contributing parameter is soft.
    pub fn is_soft(&self) -> bool {
        self.parameters.iter().all(Parameter::is_soft)
    }

    pub fn is_hard(&self) -> bool {
        !self.is_soft()
    }
}

/// Collects the outcomes of one row.
#[derive(Debug, Default)]
pub(crate) struct RowAccumulator<'a> {
    failed: Vec<&'a Parameter>,
}

impl<'a> RowAccumulator<'a> {
    pub(crate) fn record(&mut self, parameter: &'a Parameter, outcome: Outcome) {
        if outcome == Outcome::Fail {
            self.failed.push(parameter);
        }
    }

    fn finish(self, line: usize, data: Option<String>) -> Option<Failure> {
        if self.failed.is_empty() {
            return None;
        }
        Some(Failure {
            line,
            parameters: self.failed.into_iter().cloned().collect(),
            data,
        })
    }
}

/// The formed parameters of one column plus the failures of its last check.
#[derive(Debug, Clone)]
pub struct Expectation {
    column: String,
    required: bool,
    kinds: BTreeSet<ParameterKind>,
    logical_type: LogicalType,
    data_type: Parameter,
    nullable: Option<Parameter>,
    regex: Vec<Parameter>,
    relative_to: Vec<Parameter>,
    failures: Vec<Failure>,
}

impl Expectation {
    /// Forms an expectation from raw parameter entries.
    ///
    /// Nothing is partially built: any malformed entry aborts formation.
    pub fn new(
        column: impl Into<String>,
        parameters: &[ParameterSpec],
        required: bool,
    ) -> Result<Self, FormationError> {
        let column = column.into();
        let mut kinds = BTreeSet::new();
        let mut data_type = None;
        let mut nullable = None;
        let mut regex = Vec::new();
        let mut relative_to = Vec::new();

        for spec in parameters {
            let parameter = Parameter::from_spec(&column, spec)?;
            let kind = parameter.kind();
            if kind.is_unique() && kinds.contains(&kind) {
                return Err(FormationError::MultipleUniqueParameters {
                    column: column.clone(),
                    kind,
                });
            }
            kinds.insert(kind);
            match parameter.value() {
                ParameterValue::DataType(logical) => data_type = Some((*logical, parameter)),
                ParameterValue::Nullable(_) => nullable = Some(parameter),
                ParameterValue::Pattern(_) => regex.push(parameter),
                ParameterValue::RelativeTo(_) => relative_to.push(parameter),
            }
        }

        let Some((logical_type, data_type)) = data_type else {
            return Err(FormationError::MissingDataType { column });
        };

        tracing::debug!(
            column = %column,
            required,
            parameters = parameters.len(),
            "Formed expectation"
        );

        Ok(Self {
            column,
            required,
            kinds,
            logical_type,
            data_type,
            nullable,
            regex,
            relative_to,
            failures: Vec::new(),
        })
    }

    /// Forms an expectation from a schema column entry.
    pub fn from_spec(column: &str, spec: &ColumnSpec) -> Result<Self, FormationError> {
        Self::new(column, &spec.parameters, spec.required)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Parameter kinds present on this expectation.
    pub fn kinds(&self) -> &BTreeSet<ParameterKind> {
        &self.kinds
    }

    pub fn has(&self, kind: ParameterKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn data_type(&self) -> LogicalType {
        self.logical_type
    }

    pub fn nullable(&self) -> Option<&Parameter> {
        self.nullable.as_ref()
    }

    /// Nulls are allowed unless a `nullable=false` parameter says otherwise.
    pub fn allows_null(&self) -> bool {
        self.nullable
            .as_ref()
            .and_then(Parameter::nullable)
            .unwrap_or(true)
    }

    pub fn regex(&self) -> &[Parameter] {
        &self.regex
    }

    pub fn relative_to(&self) -> &[Parameter] {
        &self.relative_to
    }

    /// Every formed parameter, in slot order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        std::iter::once(&self.data_type)
            .chain(self.nullable.iter())
            .chain(self.regex.iter())
            .chain(self.relative_to.iter())
    }

    /// Checks every cell of `column`, replacing any previous failures.
    ///
    /// Returns true when no hard failure was found.
    pub fn check(&mut self, column: &Column) -> bool {
        self.clear();
        tracing::info!(column = %self.column, rows = column.len(), "Checking column");

        let mut failures = Vec::new();
        for idx in 0..column.len() {
            let value = column.get(idx).unwrap_or(AnyValue::Null);
            let text = cell_text(value);

            let mut row = RowAccumulator::default();
            for (kind, cell_check) in CELL_CHECKS {
                if self.kinds.contains(kind) {
                    cell_check(self, text.as_deref(), &mut row);
                }
            }
            if let Some(failure) = row.finish(idx, text) {
                failures.push(failure);
            }
        }

        for failure in &failures {
            let parameters = failure
                .parameters
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            let data = failure.data.as_deref().unwrap_or("<null>");
            if failure.is_soft() {
                tracing::warn!(
                    column = %self.column,
                    line = failure.line,
                    data,
                    %parameters,
                    "Soft failure"
                );
            } else {
                tracing::error!(
                    column = %self.column,
                    line = failure.line,
                    data,
                    %parameters,
                    "Hard failure"
                );
            }
        }
        self.failures = failures;

        let passed = self.fails().next().is_none();
        tracing::info!(
            column = %self.column,
            passed,
            hard = self.fails().count(),
            soft = self.soft_fails().count(),
            "Column check finished"
        );
        passed
    }

    /// Drops the failures of the previous check.
    pub fn clear(&mut self) {
        if !self.failures.is_empty() {
            tracing::info!(column = %self.column, "Clearing previous failures");
        }
        self.failures.clear();
    }

    /// Every failure of the last check, hard and soft, in row order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Failures with at least one hard parameter.
    pub fn fails(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|failure| failure.is_hard())
    }

    /// Failures whose parameters are all soft.
    pub fn soft_fails(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter().filter(|failure| failure.is_soft())
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Expectation: {} - Fails: {} - Soft Fails: {}>",
            self.column,
            self.fails().count(),
            self.soft_fails().count()
        )
    }
}

/// A null cell fails a `nullable=false` parameter. Never an explicit pass.
fn check_nullable<'a>(exp: &'a Expectation, cell: Option<&str>, row: &mut RowAccumulator<'a>) {
    let Some(parameter) = exp.nullable.as_ref() else {
        return;
    };
    let outcome = match (parameter.nullable(), cell) {
        (Some(false), None) => Outcome::Fail,
        _ => Outcome::Inconclusive,
    };
    row.record(parameter, outcome);
}

/// Each pattern is evaluated on the text of a non-null cell.
fn check_regex<'a>(exp: &'a Expectation, cell: Option<&str>, row: &mut RowAccumulator<'a>) {
    let Some(text) = cell else {
        return;
    };
    for parameter in &exp.regex {
        let Some(pattern) = parameter.pattern() else {
            continue;
        };
        let outcome = if pattern.is_match(text) {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        row.record(parameter, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn text_column(values: &[Option<&str>]) -> Column {
        Series::new("c".into(), values).into()
    }

    fn base_params() -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("data_type", "integer"),
            ParameterSpec::new("regex", "[0-9]+"),
            ParameterSpec::new("nullable", false),
        ]
    }

    #[test]
    fn missing_data_type_is_rejected() {
        let err = Expectation::new("AK_ID", &[ParameterSpec::new("nullable", true)], true)
            .unwrap_err();
        assert!(matches!(err, FormationError::MissingDataType { .. }));
    }

    #[test]
    fn duplicate_unique_kinds_are_rejected() {
        for name in ["data_type", "nullable"] {
            let value: memsynth_model::RawValue = if name == "nullable" {
                true.into()
            } else {
                "string".into()
            };
            let params = vec![
                ParameterSpec::new("data_type", "string"),
                ParameterSpec::new("nullable", true),
                ParameterSpec::new(name, value),
            ];
            let err = Expectation::new("AK_ID", &params, true).unwrap_err();
            assert!(err.to_string().contains("multiple unique parameters"));
        }
    }

    #[test]
    fn declared_type_is_kept() {
        for (declared, logical) in [
            ("date", LogicalType::Date),
            ("boolean", LogicalType::Boolean),
            ("string", LogicalType::String),
        ] {
            let params = vec![
                ParameterSpec::new("nullable", true),
                ParameterSpec::new("data_type", declared),
            ];
            let exp = Expectation::new("c", &params, true).unwrap();
            assert_eq!(exp.data_type(), logical);
            assert_eq!(exp.parameters().next().and_then(Parameter::data_type), Some(logical));
        }
    }

    #[test]
    fn regex_may_repeat() {
        let params = vec![
            ParameterSpec::new("data_type", "string"),
            ParameterSpec::new("regex", "[A-Z]"),
            ParameterSpec::new("regex", "[A-Z]{2}"),
        ];
        let exp = Expectation::new("State", &params, true).unwrap();
        assert_eq!(exp.regex().len(), 2);
        assert!(exp.allows_null());
    }

    #[test]
    fn passing_column() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        let col = text_column(&[Some("127296"), Some("5508"), Some("94792")]);
        assert!(exp.check(&col));
        assert_eq!(exp.fails().count(), 0);
        assert_eq!(exp.soft_fails().count(), 0);
    }

    #[test]
    fn partial_regex_failures_are_hard() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        let col = text_column(&[
            Some("127296"),
            Some("d%sq+`1"),
            Some("5508"),
            Some("94792"),
            Some("De32"),
        ]);
        assert!(!exp.check(&col));
        let lines: Vec<usize> = exp.fails().map(|f| f.line).collect();
        assert_eq!(lines, vec![1, 4]);
        assert_eq!(exp.fails().next().unwrap().data.as_deref(), Some("d%sq+`1"));
    }

    #[test]
    fn null_fails_nullable_only() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        assert!(!exp.check(&text_column(&[Some("12345"), None])));
        let failures: Vec<&Failure> = exp.fails().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].line, 1);
        assert_eq!(failures[0].data, None);
        let kinds: Vec<ParameterKind> = failures[0].parameters.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, vec![ParameterKind::Nullable]);
    }

    #[test]
    fn numeric_cells_are_checked_as_text() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        let col: Column = Series::new("c".into(), &[Some(127296i64), None, Some(5508)]).into();
        assert!(!exp.check(&col));
        assert_eq!(exp.fails().count(), 1);
    }

    #[test]
    fn mixed_soft_and_hard_on_one_row_is_hard() {
        let params = vec![
            ParameterSpec::new("data_type", "string"),
            ParameterSpec::new("regex", "[0-9]+").soft(),
            ParameterSpec::new("regex", "[A-Z]+"),
        ];
        let mut exp = Expectation::new("c", &params, true).unwrap();
        assert!(!exp.check(&text_column(&[Some("abc")])));
        let failure = exp.fails().next().unwrap();
        assert_eq!(failure.parameters.len(), 2);
        assert_eq!(exp.soft_fails().count(), 0);
    }

    #[test]
    fn recheck_replaces_failures() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        assert!(!exp.check(&text_column(&[None, None])));
        assert_eq!(exp.failures().len(), 2);
        assert!(exp.check(&text_column(&[Some("1")])));
        assert!(exp.failures().is_empty());
    }

    #[test]
    fn display_counts_fails() {
        let mut exp = Expectation::new("AK_ID", &base_params(), true).unwrap();
        exp.check(&text_column(&[None, Some("x")]));
        assert_eq!(exp.to_string(), "<Expectation: AK_ID - Fails: 2 - Soft Fails: 0>");
    }
}
