//! Index entry representation
//!
//! Each entry maps a path, relative to the repository root and separated by
//! `/`, to the digest of the blob staged for it.
//!
//! ## Entry Format
//!
//! One line per entry: `<40-hex-digest>\t<path>\n`

use crate::areas::repository::REPOSITORY_DIR;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::path::{Component, Path};

/// Staged path and the blob it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Path relative to the repository root, `/`-separated
    pub name: String,
    pub oid: ObjectId,
}

impl IndexEntry {
    /// Build an entry, normalising `path` to `/`-separated form
    pub fn try_new(path: &Path, oid: ObjectId) -> Result<Self> {
        Ok(IndexEntry {
            name: Self::normalize_path(path)?,
            oid,
        })
    }

    /// `/`-separated form of a stageable path
    ///
    /// Fails with `InvalidArgument` for absolute paths, `.`/`..` segments,
    /// paths inside the repository directory, and names containing a tab or
    /// newline (they would break the line format).
    pub fn normalize_path(path: &Path) -> Result<String> {
        let mut segments = Vec::new();

        for component in path.components() {
            match component {
                Component::Normal(segment) => {
                    let segment = segment.to_str().ok_or_else(|| {
                        Error::invalid_argument(format!("path {} is not valid UTF-8", path.display()))
                    })?;
                    segments.push(segment);
                }
                Component::CurDir => {}
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "path {} must be relative to the repository root",
                        path.display()
                    )));
                }
            }
        }

        let name = segments.join("/");
        if name.is_empty() || name.contains(['\t', '\n']) || segments[0] == REPOSITORY_DIR {
            return Err(Error::invalid_argument(format!(
                "cannot stage path {:?}",
                path.display()
            )));
        }

        Ok(name)
    }

    /// Last path segment
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Serialize as one index line, including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\t{}\n", self.oid, self.name)
    }

    /// Parse one index line (without its trailing newline)
    pub fn parse_line(line: &str) -> Result<Self> {
        let (oid, name) = line
            .split_once('\t')
            .ok_or_else(|| Error::corrupt(format!("index line {line:?} has no tab separator")))?;
        let oid = ObjectId::try_parse(oid.to_string())
            .map_err(|_| Error::corrupt(format!("index line {line:?} has an invalid digest")))?;

        if name.is_empty() {
            return Err(Error::corrupt(format!("index line {line:?} has an empty path")));
        }

        Ok(IndexEntry {
            name: name.to_string(),
            oid,
        })
    }
}
