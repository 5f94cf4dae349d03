//! CLI library components for the membership list validator.

pub mod logging;
pub mod pipeline;
pub mod types;
