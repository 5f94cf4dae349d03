//! The validation session.
//!
//! A [`Session`] owns one membership table and the expectations it is
//! checked against. Loading reconciles the column set and coerces types;
//! checking runs every expectation and records the overall [`ListState`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use memsynth_ingest::{read_csv_table, read_schema};
use memsynth_model::{ListState, Schema};
use polars::prelude::DataFrame;

use crate::coerce::coerce_types;
use crate::error::{IntegrityError, LoadError, Result, SessionError};
use crate::expectation::{Expectation, Failure};
use crate::reconcile::verify_format;
use crate::report::FailureReport;

/// Options for [`Session::check_with`].
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    /// Hard failures raise [`IntegrityError`] and soft failures fail the verdict.
    pub strict: bool,
    /// Re-run column reconciliation before checking.
    pub verify_format: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            strict: true,
            verify_format: false,
        }
    }
}

/// A membership list under validation.
#[derive(Debug, Default)]
pub struct Session {
    name: Option<String>,
    table: Option<DataFrame>,
    expectations: BTreeMap<String, Expectation>,
    condition: ListState,
    soft_loaded: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Display name, `"unnamed"` until one is set or a file is loaded.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn condition(&self) -> ListState {
        self.condition
    }

    pub fn table(&self) -> Option<&DataFrame> {
        self.table.as_ref()
    }

    /// Mutable access to the loaded table. Any change marks the list dirty.
    pub fn table_mut(&mut self) -> Option<&mut DataFrame> {
        self.condition = ListState::Dirty;
        self.table.as_mut()
    }

    pub fn expectations(&self) -> &BTreeMap<String, Expectation> {
        &self.expectations
    }

    pub fn expectation(&self, column: &str) -> Option<&Expectation> {
        self.expectations.get(column)
    }

    /// Forms every expectation of `schema`, replacing the current ones.
    ///
    /// On error the previous expectations are kept.
    pub fn load_expectations(&mut self, schema: &Schema) -> Result<()> {
        let expectations = schema
            .columns
            .iter()
            .map(|(column, spec)| {
                Expectation::from_spec(column, spec).map(|exp| (column.clone(), exp))
            })
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;
        tracing::info!(
            session = %self.name(),
            columns = expectations.len(),
            "Loaded expectations"
        );
        self.expectations = expectations;
        self.condition = ListState::Dirty;
        Ok(())
    }

    /// Reads a JSON schema document and forms its expectations.
    pub fn load_expectations_from_json(&mut self, path: &Path) -> Result<()> {
        let schema = read_schema(path)?;
        self.load_expectations(&schema)
    }

    /// Accepts an in-memory table: reconciles columns, then coerces types.
    ///
    /// On error no table is left loaded.
    pub fn load_from_memory(&mut self, df: DataFrame, soft_load: bool) -> Result<()> {
        self.table = None;
        self.condition = ListState::Dirty;
        self.soft_loaded = soft_load;
        match self.accept(df, soft_load) {
            Ok(df) => {
                tracing::info!(
                    session = %self.name(),
                    rows = df.height(),
                    columns = df.width(),
                    soft_load,
                    "Loaded membership list"
                );
                self.table = Some(df);
                Ok(())
            }
            Err(err) => {
                tracing::error!(
                    session = %self.name(),
                    error = %err,
                    "Failed to load membership list"
                );
                Err(err.into())
            }
        }
    }

    /// Reads a CSV membership list and loads it.
    ///
    /// An unnamed session takes the file name.
    pub fn load_from_csv(&mut self, path: &Path, soft_load: bool) -> Result<()> {
        if self.name.is_none()
            && let Some(file_name) = path.file_name()
        {
            self.name = Some(file_name.to_string_lossy().into_owned());
        }
        let df = match read_csv_table(path) {
            Ok(df) => df,
            Err(err) => {
                self.table = None;
                self.condition = ListState::Dirty;
                return Err(LoadError::from(err).into());
            }
        };
        self.load_from_memory(df, soft_load)
    }

    fn accept(
        &self,
        mut df: DataFrame,
        soft_load: bool,
    ) -> std::result::Result<DataFrame, LoadError> {
        verify_format(&self.expectations, &column_names(&df), soft_load).map_err(|mismatch| {
            LoadError::ColumnMismatch {
                name: self.name().to_string(),
                mismatch,
            }
        })?;
        coerce_types(&mut df, &self.expectations)?;
        Ok(df)
    }

    /// Checks every expectation against the loaded table.
    ///
    /// Strict: hard failures raise [`IntegrityError`], soft failures return
    /// `false`. Lenient: hard failures return `false`, soft failures `true`.
    pub fn check_membership_list_on_parameters(&mut self, strict: bool) -> Result<bool> {
        self.check_with(CheckOptions {
            strict,
            ..CheckOptions::default()
        })
    }

    pub fn check_with(&mut self, options: CheckOptions) -> Result<bool> {
        let name = self.name().to_string();
        let Some(df) = self.table.as_ref() else {
            return Err(SessionError::NotLoaded { name });
        };

        self.condition = ListState::Dirty;

        // Expectations may have been reloaded since the table was accepted.
        let columns = column_names(df);
        let required_absent = self
            .expectations
            .values()
            .any(|exp| exp.is_required() && !columns.iter().any(|name| name == exp.column()));
        if options.verify_format || required_absent {
            verify_format(&self.expectations, &columns, self.soft_loaded).map_err(|mismatch| {
                LoadError::ColumnMismatch {
                    name: name.clone(),
                    mismatch,
                }
            })?;
        }

        tracing::info!(session = %name, strict = options.strict, "Checking membership list");

        let mut failing = Vec::new();
        let mut hard_failures = 0;
        let mut soft_failures = 0;
        for (column, expectation) in &mut self.expectations {
            // Only optional columns can be absent here.
            let Ok(values) = df.column(column) else {
                expectation.clear();
                continue;
            };
            if !expectation.check(values) {
                failing.push(column.clone());
            }
            hard_failures += expectation.fails().count();
            soft_failures += expectation.soft_fails().count();
        }

        self.condition = if hard_failures > 0 {
            ListState::Failure
        } else if soft_failures > 0 {
            ListState::SoftFailure
        } else {
            ListState::Success
        };
        tracing::info!(
            session = %name,
            condition = %self.condition,
            hard = hard_failures,
            soft = soft_failures,
            "Membership list checked"
        );

        match self.condition {
            ListState::Failure if options.strict => Err(IntegrityError {
                name,
                columns: failing,
                hard_failures,
            }
            .into()),
            ListState::Failure => Ok(false),
            ListState::SoftFailure => Ok(!options.strict),
            ListState::Success | ListState::Dirty => Ok(true),
        }
    }

    /// Failures per column, for `columns` (default: every column).
    ///
    /// Only columns with failures appear; hard failures come first.
    pub fn get_failures(
        &self,
        columns: Option<&[&str]>,
        include_soft: bool,
    ) -> BTreeMap<String, Vec<&Failure>> {
        self.expectations
            .iter()
            .filter(|(column, _)| columns.is_none_or(|wanted| wanted.contains(&column.as_str())))
            .filter_map(|(column, expectation)| {
                let mut failures: Vec<&Failure> = expectation.fails().collect();
                if include_soft {
                    failures.extend(expectation.soft_fails());
                }
                (!failures.is_empty()).then(|| (column.clone(), failures))
            })
            .collect()
    }

    /// Builds the failure report of the last check and logs it.
    pub fn report_failures(&self) -> FailureReport {
        let report = FailureReport::build(self.name(), self.condition, self.expectations.values());
        report.log();
        report
    }
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expectations = if self.expectations.is_empty() {
            "NULL"
        } else {
            "LOADED"
        };
        let table = match &self.table {
            None => "NULL",
            Some(df) if df.height() == 0 => "EMPTY",
            Some(_) => "LOADED",
        };
        write!(
            f,
            "<Session - {} - Expectations {expectations} - Table {table} - Condition {}>",
            self.name(),
            self.condition
        )
    }
}
