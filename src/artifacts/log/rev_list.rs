use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use tracing::trace;

/// Linear history starting at the current commit
///
/// Holds no cursor of its own: every call to [`RevList::into_iter`] resolves
/// HEAD again, so the same repository state always yields the same sequence.
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> Result<RevListIntoIter<'r>> {
        Ok(RevListIntoIter {
            repository: self.repository,
            current_commit_oid: self.repository.current_commit()?,
        })
    }
}

/// Walks `parent` links newest first; ends after the root commit
///
/// A commit that cannot be loaded is yielded as an error and ends the walk.
#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = Result<(ObjectId, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        match self.repository.database().parse_object_as_commit(&commit_oid) {
            Ok(Some(commit)) => {
                trace!(oid = %commit_oid, parent = ?commit.parent(), "visited commit");
                // Move to the parent commit for the next iteration
                self.current_commit_oid = commit.parent().cloned();
                Some(Ok((commit_oid, commit)))
            }
            Ok(None) => Some(Err(Error::corrupt(format!(
                "history refers to {commit_oid}, which is not a commit"
            )))),
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::Author;
    use crate::artifacts::tree::tree_builder::TreeBuilder;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::BTreeMap;

    #[fixture]
    fn dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child(".mingit/HEAD").write_str("ref: refs/heads/main\n").unwrap();
        dir
    }

    fn repository(dir: &TempDir) -> Repository {
        Repository::open(dir.path(), Box::new(std::io::sink())).unwrap()
    }

    fn commit_chain(repository: &Repository, messages: &[&str]) -> Vec<ObjectId> {
        let tree = TreeBuilder::new(repository.database()).build(&BTreeMap::new()).unwrap();
        let mut parent = None;
        let mut oids = Vec::new();

        for message in messages {
            let commit = Commit::new(parent.clone(), tree.clone(), Author::default(), message.to_string());
            let oid = repository.database().store(&commit).unwrap();
            repository.update_branch(&oid).unwrap();
            parent = Some(oid.clone());
            oids.push(oid);
        }

        oids
    }

    fn messages(repository: &Repository) -> Vec<String> {
        RevList::new(repository)
            .into_iter()
            .unwrap()
            .map(|entry| entry.unwrap().1.message().to_string())
            .collect()
    }

    #[rstest]
    fn empty_history_yields_nothing(dir: TempDir) {
        let repository = repository(&dir);

        assert_eq!(RevList::new(&repository).into_iter().unwrap().count(), 0);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    fn linear_chain_yields_every_commit_newest_first(dir: TempDir, #[case] length: usize) {
        let repository = repository(&dir);
        let names = (0..length).map(|n| format!("commit {n}")).collect::<Vec<_>>();
        let oids = commit_chain(&repository, &names.iter().map(String::as_str).collect::<Vec<_>>());

        let walked = RevList::new(&repository)
            .into_iter()
            .unwrap()
            .map(|entry| entry.unwrap())
            .collect::<Vec<_>>();

        assert_eq!(walked.len(), length);
        assert_eq!(
            walked.iter().map(|(oid, _)| oid.clone()).collect::<Vec<_>>(),
            oids.into_iter().rev().collect::<Vec<_>>()
        );
        assert_eq!(walked.last().unwrap().1.parent(), None);
    }

    #[rstest]
    fn walking_twice_gives_the_same_sequence(dir: TempDir) {
        let repository = repository(&dir);
        commit_chain(&repository, &["First!", "Update"]);

        assert_eq!(messages(&repository), vec!["Update", "First!"]);
        assert_eq!(messages(&repository), messages(&repository));
    }

    #[rstest]
    fn missing_parent_ends_walk_with_error(dir: TempDir) {
        let repository = repository(&dir);
        let tree = TreeBuilder::new(repository.database()).build(&BTreeMap::new()).unwrap();
        let dangling = ObjectId::try_parse("0123456789abcdef0123456789abcdef01234567".to_string()).unwrap();
        let commit = Commit::new(Some(dangling), tree, Author::default(), "orphan".to_string());
        let oid = repository.database().store(&commit).unwrap();
        repository.update_branch(&oid).unwrap();

        let walked = RevList::new(&repository).into_iter().unwrap().collect::<Vec<_>>();

        assert_eq!(walked.len(), 2);
        assert!(walked[0].is_ok());
        assert!(matches!(walked[1], Err(Error::NotFound(_))));
    }
}
