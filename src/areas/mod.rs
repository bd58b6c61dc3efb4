//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, and commits
//! - `index`: Staging area mapping paths to blob digests
//! - `refs`: HEAD and branch references
//! - `repository`: Repository context tying the stores together
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
