//! mingit: a minimal content-addressed version control core
//!
//! - `areas`: the persistent stores of a repository
//! - `artifacts`: object encodings and the algorithms built on them
//! - `commands`: command bodies, printing through the repository writer
//! - `errors`: the typed failures every store reports

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
