//! Plumbing commands (low-level object operations)
//!
//! Plumbing commands give direct access to the object database. They are
//! building blocks for scripting and for the porcelain commands.
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob digest and optionally store the blob
//! - `cat-file`: Print an object's content, kind or size
//! - `write-tree`: Snapshot the working directory as a tree
//! - `ls-tree`: List one level of a tree
//! - `commit-tree`: Create a commit for an existing tree

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
