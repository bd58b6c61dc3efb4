//! Command implementations
//!
//! - `plumbing`: Low-level commands for direct object manipulation
//! - `porcelain`: User-facing commands for the stage, commit, checkout, log workflow
//!
//! Every command is an `impl Repository` block returning `anyhow::Result` and
//! printing through the repository writer.

pub mod plumbing;
pub mod porcelain;
