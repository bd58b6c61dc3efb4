//! Commit history traversal
//!
//! - `rev_list`: walks the parent chain from the current commit
//!
//! History is linear: every commit has at most one parent, so traversal is a
//! single pointer chase that ends at the root commit.

pub mod rev_list;
