//! Index file format
//!
//! The index (also called staging area) maps paths to the blob digests queued
//! for the next commit.
//!
//! ## File Format
//!
//! ```text
//! <40-hex-digest>\t<path>\n     (one line per entry, sorted by path)
//! ```
//!
//! The file is rewritten wholesale on every update.

pub mod index_entry;
