//! Membership list validation engine.
//!
//! A schema describes each column of a membership roster: its data type,
//! nullability and any number of hard or soft patterns. This crate turns
//! that schema into [`Expectation`]s and runs them over a Polars table.
//!
//! # Flow
//!
//! 1. [`Session::load_expectations`] forms one [`Expectation`] per column
//! 2. [`Session::load_from_memory`] / [`Session::load_from_csv`] reconcile the
//!    column set ([`verify_format`]) and coerce column types ([`coerce_types`])
//! 3. [`Session::check_membership_list_on_parameters`] checks every column and
//!    sets the list's [`ListState`](memsynth_model::ListState)
//! 4. [`Session::get_failures`] and [`Session::report_failures`] expose results
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use memsynth_validate::Session;
//!
//! let mut session = Session::new();
//! session.load_expectations_from_json(Path::new("params.json"))?;
//! session.load_from_csv(Path::new("roster.csv"), false)?;
//! if !session.check_membership_list_on_parameters(false)? {
//!     println!("{}", session.report_failures());
//! }
//! ```

pub mod cell;
mod coerce;
mod error;
mod expectation;
pub mod parameter;
mod reconcile;
mod report;
mod session;
mod states;

// === Errors ===
pub use error::{
    ColumnMismatch, FormationError, IntegrityError, LoadError, Result, SessionError,
};

// === Expectations ===
pub use expectation::{Expectation, Failure};
pub use parameter::{Parameter, ParameterValue, Pattern, flags};
pub use states::US_STATE_CODES;

// === Loading ===
pub use coerce::{coerce_column, coerce_types};
pub use reconcile::verify_format;

// === Session ===
pub use report::{ColumnFailures, FailureLine, FailureReport, ParameterTag};
pub use session::{CheckOptions, Session};
