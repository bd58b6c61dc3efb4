use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Error;

impl Repository {
    /// List the direct entries of a tree; a commit digest lists its tree
    pub fn ls_tree(&mut self, object_sha: &str) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_sha.to_string())?;

        let tree = match self.database().parse_object(&oid)? {
            ObjectBox::Tree(tree) => *tree,
            ObjectBox::Commit(commit) => self.database().load_tree(commit.tree_oid())?,
            ObjectBox::Blob(_) => {
                return Err(Error::invalid_argument(format!("object {oid} is not a tree")).into());
            }
        };

        for entry in tree.entries() {
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode,
                entry.object_type(),
                entry.oid,
                entry.name
            )?;
        }

        Ok(())
    }
}
