//! Checkout of a commit into the working directory
//!
//! A [`migration::Migration`] materialises every file of the target commit's
//! tree and then moves the current branch. It never deletes files.

pub mod migration;
