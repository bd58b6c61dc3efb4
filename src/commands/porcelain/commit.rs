use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::tree::tree_builder::TreeBuilder;
use crate::errors::Error;
use tracing::info;

impl Repository {
    /// Commit the staged files on top of the current commit
    ///
    /// Steps run one after the other with no rollback: merge the index with
    /// the HEAD tree, build and store the tree, store the commit, move the
    /// branch, then clear the index.
    pub fn commit(&mut self, message: &str, author: Author) -> anyhow::Result<()> {
        let mut index = self.index();

        // Load the index file from the disk
        index.rehydrate()?;
        if index.is_empty() {
            return Err(Error::invalid_argument("nothing staged for commit").into());
        }

        let tree_entries = index.merge_with_tree(self.current_tree_entries()?);
        let tree_id = TreeBuilder::new(self.database()).build(&tree_entries)?;

        let parent = self.current_commit()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let commit = Commit::new(parent, tree_id, author, message.to_string());
        let commit_id = self.database().store(&commit)?;
        self.update_branch(&commit_id)?;

        index.clear();
        index.write_updates()?;
        drop(index);

        let branch = self
            .refs()
            .current_branch()?
            .unwrap_or_else(|| "detached HEAD".to_string());
        info!(branch = %branch, oid = %commit_id, "created commit");

        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
