//! Checkout migration
//!
//! Moves the working directory and the current branch to a target commit:
//!
//! 1. Flatten the target commit's tree into `path -> blob` actions
//! 2. Write every blob to its working-directory path, creating parent
//!    directories and overwriting whatever file is there
//! 3. Point the current branch (or detached HEAD) at the target commit
//!
//! Checkout only adds and overwrites. Files absent from the target tree are
//! left in place, and the index is not touched.

use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Planned file writes, by working-directory path
pub type ActionsSet = BTreeMap<String, DatabaseEntry>;

pub struct Migration<'r> {
    repository: &'r Repository,
    /// Commit being checked out
    target: ObjectId,
    /// Planned file system actions
    actions: ActionsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, target: ObjectId) -> Self {
        Migration {
            repository,
            target,
            actions: ActionsSet::new(),
        }
    }

    pub fn target(&self) -> &ObjectId {
        &self.target
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    /// Plan, write the working directory, then move the branch
    ///
    /// Steps run in order with no rollback: a failure while writing files
    /// leaves earlier files written and the branch where it was.
    pub fn apply_changes(&mut self) -> Result<()> {
        self.plan_changes()?;
        self.update_workspace()?;
        self.repository.update_branch(&self.target)?;

        info!(target = %self.target, files = self.actions.len(), "checked out commit");
        Ok(())
    }

    fn plan_changes(&mut self) -> Result<()> {
        let commit = self.repository.load_commit(&self.target)?;
        self.actions = self.repository.database().flatten_tree(commit.tree_oid())?;

        Ok(())
    }

    fn update_workspace(&self) -> Result<()> {
        for (path, entry) in &self.actions {
            let EntryMode::File(mode) = entry.mode else {
                return Err(Error::corrupt(format!("{path} flattened to a subtree")));
            };

            let data = self.load_blob_data(&entry.oid)?;
            self.repository.workspace().write_file(path, &data, mode)?;
            debug!(path = %path, oid = %entry.oid, "restored file");
        }

        Ok(())
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> Result<Bytes> {
        self.repository
            .database()
            .parse_object_as_blob(object_id)?
            .map(|blob| blob.into_content())
            .ok_or_else(|| Error::corrupt(format!("tree entry {object_id} is not a blob")))
    }
}
