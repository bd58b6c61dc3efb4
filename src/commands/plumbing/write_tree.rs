use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::tree::tree_builder::TreeBuilder;
use std::collections::BTreeMap;
use std::path::Path;

impl Repository {
    /// Store every working-directory file outside `.mingit` and print the root tree digest
    ///
    /// Works from the files on disk, not from the index.
    pub fn write_tree(&mut self) -> anyhow::Result<()> {
        let mut entries = BTreeMap::new();

        for path in self.workspace().list_files()? {
            let data = self.workspace().read_file(Path::new(&path))?;
            let mode = self.workspace().file_mode(Path::new(&path))?;
            let oid = self.database().write(&data, ObjectType::Blob)?;

            entries.insert(path, DatabaseEntry::new(oid, mode.into()));
        }

        let tree_oid = TreeBuilder::new(self.database()).build_with_modes(&entries)?;
        writeln!(self.writer(), "{tree_oid}")?;

        Ok(())
    }
}
