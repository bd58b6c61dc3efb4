use crate::areas::refs::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create `.mingit/{objects,refs/heads}` and point HEAD at the default branch
    ///
    /// An existing repository is reported and left untouched. The branch ref
    /// itself is only created by the first commit.
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.refs().head_path().exists() {
            writeln!(
                self.writer(),
                "Reinitialized existing repository in {}",
                self.git_path().display()
            )?;
            return Ok(());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .mingit/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .mingit/refs/heads directory")?;

        self.refs()
            .set_head(DEFAULT_BRANCH)
            .context("Failed to create initial HEAD reference")?;

        writeln!(
            self.writer(),
            "Initialized empty repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
