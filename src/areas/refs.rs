//! References (HEAD and branches)
//!
//! `HEAD` names the active branch with a symbolic line, or holds a commit
//! digest directly when detached. Each branch is a file under `refs/heads`
//! holding the digest of its tip commit.
//!
//! ## File Format
//!
//! - `HEAD`: `ref: refs/heads/<branch>\n` or `<40-hex-digest>\n`
//! - `refs/heads/<branch>`: `<40-hex-digest>\n`

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Branch a fresh repository starts on
pub const DEFAULT_BRANCH: &str = "main";

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

/// What HEAD currently points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// Symbolic reference to `refs/heads/<name>`
    Branch(String),
    /// Commit digest stored in HEAD itself
    Detached(ObjectId),
}

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.mingit`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn branch_path(&self, branch: &str) -> PathBuf {
        self.heads_path().join(branch)
    }

    /// Parse HEAD. A missing HEAD file is `NotFound`.
    pub fn read_head_target(&self) -> Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .map_err(|err| Error::from_io_at(err, Path::new(HEAD_REF_NAME)))?;
        let content = content.trim();

        let symref = Regex::new(SYMREF_REGEX)
            .map_err(|err| Error::invalid_argument(format!("bad symref pattern: {err}")))?;
        if let Some(captures) = symref.captures(content) {
            return Ok(Head::Branch(captures[1].to_string()));
        }

        ObjectId::try_parse(content.to_string())
            .map(Head::Detached)
            .map_err(|_| Error::corrupt(format!("unrecognised HEAD content {content:?}")))
    }

    /// Branch HEAD points at, or `None` when detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.read_head_target()? {
            Head::Branch(name) => Ok(Some(name)),
            Head::Detached(_) => Ok(None),
        }
    }

    /// Commit HEAD resolves to, or `None` while the current branch has no commits
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        match self.read_head_target()? {
            Head::Branch(name) => self.read_branch(&name),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn read_branch(&self, branch: &str) -> Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch);
        let content = match std::fs::read_to_string(&branch_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        ObjectId::try_parse(content.trim().to_string())
            .map(Some)
            .map_err(|_| Error::corrupt(format!("branch {branch} holds an invalid digest")))
    }

    /// Move whatever HEAD points at to `oid`
    ///
    /// On a branch the branch file is overwritten; when detached, HEAD itself.
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        match self.read_head_target()? {
            Head::Branch(name) => {
                self.update_ref_file(&self.branch_path(&name), &format!("{oid}\n"))?;
                info!(branch = %name, oid = %oid, "moved branch");
            }
            Head::Detached(_) => {
                self.update_ref_file(&self.head_path(), &format!("{oid}\n"))?;
                info!(oid = %oid, "moved detached HEAD");
            }
        }

        Ok(())
    }

    /// Point HEAD at `refs/heads/<branch>`
    pub fn set_head(&self, branch: &str) -> Result<()> {
        if branch.is_empty() || branch.contains(char::is_whitespace) {
            return Err(Error::invalid_argument(format!("invalid branch name {branch:?}")));
        }

        self.update_ref_file(&self.head_path(), &format!("ref: refs/heads/{branch}\n"))
    }

    /// Store `oid` in HEAD, leaving every branch untouched
    pub fn detach_head(&self, oid: &ObjectId) -> Result<()> {
        self.update_ref_file(&self.head_path(), &format!("{oid}\n"))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, raw_ref)?;

        Ok(())
    }
}
