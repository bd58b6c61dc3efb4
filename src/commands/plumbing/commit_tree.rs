use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;

impl Repository {
    /// Write a commit for an existing tree and print its digest
    ///
    /// Refs are not touched.
    pub fn commit_tree(
        &mut self,
        tree_sha: &str,
        message: &str,
        parent_sha: Option<&str>,
        author: Author,
    ) -> anyhow::Result<()> {
        let tree_oid = ObjectId::try_parse(tree_sha.to_string())?;
        if self.database().parse_object_as_tree(&tree_oid)?.is_none() {
            return Err(Error::invalid_argument(format!("object {tree_oid} is not a tree")).into());
        }

        let parent = match parent_sha {
            Some(parent_sha) => {
                let parent = ObjectId::try_parse(parent_sha.to_string())?;
                self.load_commit(&parent)?;
                Some(parent)
            }
            None => None,
        };

        let commit = Commit::new(parent, tree_oid, author, message.to_string());
        let commit_id = self.database().store(&commit)?;

        writeln!(self.writer(), "{commit_id}")?;

        Ok(())
    }
}
