//! Error taxonomy for the repository core
//!
//! Every store and algorithm in `areas` and `artifacts` reports failures through
//! [`Error`]. Only the command layer turns them into user-facing messages.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing object, working-directory file, ref or repository
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed header, truncated tree/commit encoding, length mismatch
    #[error("corrupt object: {0}")]
    Corrupt(String),

    /// Malformed digest string or otherwise unusable user input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn corrupt(reason: impl Into<String>) -> Self {
        Error::Corrupt(reason.into())
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }

    /// Process exit code for this failure: 1 for user input, 2 for storage
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NotFound(_) | Error::InvalidArgument(_) => 1,
            Error::Corrupt(_) | Error::Io(_) => 2,
        }
    }

    /// Map an I/O error on `path` to `NotFound` when the file is missing
    pub(crate) fn from_io_at(error: io::Error, path: &std::path::Path) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(error),
        }
    }
}
