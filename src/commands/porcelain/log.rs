use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;

impl Repository {
    /// Print the history of the current commit, newest first
    pub fn log(&mut self) -> anyhow::Result<()> {
        let mut commits = RevList::new(self).into_iter()?.peekable();

        if commits.peek().is_none() {
            writeln!(self.writer(), "No commits yet")?;
            return Ok(());
        }

        let mut first = true;
        for entry in commits {
            let (oid, commit) = entry?;

            if !first {
                writeln!(self.writer())?;
            }
            first = false;

            self.show_commit_medium(&oid, &commit)?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "{}", format!("commit {oid}").yellow())?;
        if let Some(author) = commit.author() {
            writeln!(self.writer(), "Author: {}", author.display_name())?;
            writeln!(self.writer(), "Date:   {}", author.readable_timestamp())?;
        }
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }
}
