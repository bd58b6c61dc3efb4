//! Repository context
//!
//! Owns the four stores of one repository (object database, index, refs and
//! working directory), each holding its own resolved path, plus the writer
//! that commands print to. Nothing is looked up from ambient global state.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::path::Path;

/// Directory holding repository data, below the working-directory root
pub const REPOSITORY_DIR: &str = ".mingit";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: RefCell<Index>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Context for the repository rooted at `path`, creating the root if needed
    ///
    /// The repository directory itself is not required to exist; see
    /// [`Repository::open`] for that.
    pub fn new(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        std::fs::create_dir_all(path)?;
        let path = path.canonicalize()?;
        let git_path = path.join(REPOSITORY_DIR);

        let index = Index::new(git_path.join("index").into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: RefCell::new(index),
            database,
            workspace,
            refs,
        })
    }

    /// Context for an existing repository; `NotFound` without a repository directory
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> Result<Self> {
        if !path.join(REPOSITORY_DIR).is_dir() {
            return Err(Error::not_found(format!(
                "repository at {}",
                path.join(REPOSITORY_DIR).display()
            )));
        }

        Self::new(path, writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> std::path::PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&'_ self) -> RefMut<'_, Index> {
        self.index.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Commit HEAD resolves to, `None` before the first commit on the branch
    pub fn current_commit(&self) -> Result<Option<ObjectId>> {
        self.refs.read_head()
    }

    /// Move the current branch (or detached HEAD) to `oid`
    pub fn update_branch(&self, oid: &ObjectId) -> Result<()> {
        self.refs.update_head(oid)
    }

    /// Load `oid` as a commit; any other kind is `InvalidArgument`
    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        self.database
            .parse_object_as_commit(oid)?
            .ok_or_else(|| Error::invalid_argument(format!("object {oid} is not a commit")))
    }

    /// Flattened `path -> blob` listing of the current commit's tree
    ///
    /// Empty when there is no current commit.
    pub fn current_tree_entries(&self) -> Result<BTreeMap<String, ObjectId>> {
        let Some(commit_oid) = self.current_commit()? else {
            return Ok(BTreeMap::new());
        };
        let commit = self.database.parse_object_as_commit(&commit_oid)?.ok_or_else(|| {
            Error::corrupt(format!("HEAD points at {commit_oid}, which is not a commit"))
        })?;

        Ok(self
            .database
            .flatten_tree(commit.tree_oid())?
            .into_iter()
            .map(|(path, entry)| (path, entry.oid))
            .collect())
    }
}
