use crate::areas::repository::Repository;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        let oid = self
            .index()
            .add_file(self.workspace(), self.database(), Path::new(path))
            .with_context(|| format!("cannot add {path}"))?;

        writeln!(self.writer(), "Added {path} ({})", oid.to_short_oid())?;

        Ok(())
    }
}
