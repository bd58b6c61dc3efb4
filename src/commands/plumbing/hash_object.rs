use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn hash_object(&mut self, object_path: &str, write: bool) -> anyhow::Result<()> {
        // read object file
        let relative_path = self.workspace().relative_path(Path::new(object_path))?;
        let data = self
            .workspace()
            .read_file(&relative_path)
            .with_context(|| format!("cannot hash {object_path}"))?;
        let object = Blob::new(data);

        // hash, and write as a compressed object file only when asked to
        let object_id = if write {
            self.database().store(&object)?
        } else {
            object.object_id()?
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
