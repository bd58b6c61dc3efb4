use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Write every file of `target` into the working directory and move the branch to it
    ///
    /// `target` must be a full commit digest.
    pub fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        let target_oid = ObjectId::try_parse(target.to_string())?;

        let mut migration = Migration::new(self, target_oid.clone());
        migration.apply_changes()?;
        let restored = migration.actions().len();

        let commit = self.load_commit(&target_oid)?;
        writeln!(
            self.writer(),
            "HEAD is now at {} {} ({} files restored)",
            target_oid.to_short_oid(),
            commit.short_message(),
            restored
        )?;

        Ok(())
    }
}
