use crate::areas::repository::Repository;
use colored::Colorize;

// Terminology:
// - staged files: paths with an entry in the index
// - untracked files: working-directory files neither staged nor in the HEAD tree
impl Repository {
    pub fn status(&mut self) -> anyhow::Result<()> {
        let staged = self.index().read()?;
        let committed = self.current_tree_entries()?;

        let untracked = self
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|path| !staged.contains_key(path) && !committed.contains_key(path))
            .collect::<Vec<_>>();

        writeln!(self.writer(), "Staged files:")?;
        if staged.is_empty() {
            writeln!(self.writer(), "  (none)")?;
        }
        for path in staged.keys() {
            writeln!(self.writer(), "  {}", path.green())?;
        }

        writeln!(self.writer())?;
        writeln!(self.writer(), "Untracked files:")?;
        if untracked.is_empty() {
            writeln!(self.writer(), "  (none)")?;
        }
        for path in &untracked {
            writeln!(self.writer(), "  {}", path.red())?;
        }

        Ok(())
    }
}
