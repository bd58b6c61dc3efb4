//! Data structures and algorithms
//!
//! - `checkout`: Materialising a commit into the working directory
//! - `database`: Database entry types
//! - `index`: Index entry format
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit)
//! - `tree`: Building nested trees from flat path listings

pub mod checkout;
pub mod database;
pub mod index;
pub mod log;
pub mod objects;
pub mod tree;
