//! Data model for membership roster validation.
//!
//! Holds the schema document types and the enumerations shared by the ingest
//! and validation crates. Compiled parameters live in `memsynth-validate`.

pub mod enums;
pub mod schema;

pub use enums::{ListState, LogicalType, MatchMode, ParameterKind};
pub use schema::{ColumnSpec, ParameterArgs, ParameterSpec, RawValue, Schema};
