//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose the stores and algorithms into the
//! stage → commit → checkout → log workflow.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file for commit
//! - `status`: Show staged and untracked files
//! - `commit`: Create a new commit
//! - `checkout`: Restore the files of a commit
//! - `log`: Show commit history

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod status;
