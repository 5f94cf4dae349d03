//! Human and machine readable summary of a session's failures.

use std::fmt;

use memsynth_model::ListState;
use serde::Serialize;

use crate::expectation::{Expectation, Failure};

/// Failures of every failing column, hard first within each column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub name: String,
    pub condition: ListState,
    pub columns: Vec<ColumnFailures>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnFailures {
    pub column: String,
    pub hard: usize,
    pub soft: usize,
    pub failures: Vec<FailureLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureLine {
    pub line: usize,
    /// Offending value, `None` for a null cell.
    pub value: Option<String>,
    pub soft: bool,
    pub parameters: Vec<ParameterTag>,
}

/// A contributing parameter rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterTag {
    pub parameter: String,
    pub soft: bool,
}

impl FailureReport {
    /// Builds the report from checked expectations.
    pub(crate) fn build<'a>(
        name: &str,
        condition: ListState,
        expectations: impl IntoIterator<Item = &'a Expectation>,
    ) -> Self {
        let columns = expectations
            .into_iter()
            .filter(|exp| !exp.failures().is_empty())
            .map(|exp| ColumnFailures {
                column: exp.column().to_string(),
                hard: exp.fails().count(),
                soft: exp.soft_fails().count(),
                failures: exp.fails().chain(exp.soft_fails()).map(line).collect(),
            })
            .collect();
        Self {
            name: name.to_string(),
            condition,
            columns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn hard_count(&self) -> usize {
        self.columns.iter().map(|c| c.hard).sum()
    }

    pub fn soft_count(&self) -> usize {
        self.columns.iter().map(|c| c.soft).sum()
    }

    /// Drops soft failure lines, and columns left with nothing to report.
    ///
    /// Per-column soft counts are kept.
    pub fn retain_hard(&mut self) {
        for column in &mut self.columns {
            column.failures.retain(|failure| !failure.soft);
        }
        self.columns.retain(|column| column.hard > 0);
    }

    /// Emits the report as log events.
    pub fn log(&self) {
        tracing::info!(
            name = %self.name,
            condition = %self.condition,
            columns = self.columns.len(),
            hard = self.hard_count(),
            soft = self.soft_count(),
            "Failure report"
        );
        for column in &self.columns {
            for failure in &column.failures {
                let value = failure.value.as_deref().unwrap_or("<null>");
                let parameters = tags(&failure.parameters);
                if failure.soft {
                    tracing::warn!(
                        column = %column.column,
                        line = failure.line,
                        value,
                        %parameters,
                        "Soft failure"
                    );
                } else {
                    tracing::error!(
                        column = %column.column,
                        line = failure.line,
                        value,
                        %parameters,
                        "Hard failure"
                    );
                }
            }
        }
    }
}

fn line(failure: &Failure) -> FailureLine {
    FailureLine {
        line: failure.line,
        value: failure.data.clone(),
        soft: failure.is_soft(),
        parameters: failure
            .parameters
            .iter()
            .map(|parameter| ParameterTag {
                parameter: parameter.to_string(),
                soft: parameter.is_soft(),
            })
            .collect(),
    }
}

fn tags(parameters: &[ParameterTag]) -> String {
    parameters
        .iter()
        .map(|tag| {
            let class = if tag.soft { "soft" } else { "hard" };
            format!("{} [{class}]", tag.parameter)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return write!(f, "{}: no failures ({})", self.name, self.condition);
        }
        for (idx, column) in self.columns.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            let total = column.hard + column.soft;
            let noun = if total == 1 { "failure" } else { "failures" };
            write!(
                f,
                "Column '{}': {total} {noun} ({} hard, {} soft)",
                column.column, column.hard, column.soft
            )?;
            for failure in &column.failures {
                let value = match &failure.value {
                    Some(value) => format!("'{value}'"),
                    None => "<null>".to_string(),
                };
                write!(
                    f,
                    "\n  line {}: {} on {value}",
                    failure.line,
                    tags(&failure.parameters)
                )?;
            }
        }
        Ok(())
    }
}
