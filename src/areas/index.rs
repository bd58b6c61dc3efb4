//! Index (staging area)
//!
//! The index tracks which blob each staged path should have in the next
//! commit. It is a plain text file, rewritten in full on every update, with
//! entries sorted by path.
//!
//! ## Data Structures
//!
//! - `entries`: staged paths mapped to their entries, kept in path order

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.mingit/index`)
    path: Box<Path>,
    /// Staged files mapped by path
    entries: BTreeMap<String, IndexEntry>,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the index from disk
    ///
    /// A missing index file is an empty index. Blank lines are skipped.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();
        self.changed = false;

        let content = match std::fs::read_to_string(self.path()) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            let entry = IndexEntry::parse_line(line)?;
            self.entries.insert(entry.name.clone(), entry);
        }

        Ok(())
    }

    /// Staged entries as an ordered `path -> digest` mapping
    pub fn read(&mut self) -> Result<BTreeMap<String, ObjectId>> {
        self.rehydrate()?;

        Ok(self
            .entries
            .values()
            .map(|entry| (entry.name.clone(), entry.oid.clone()))
            .collect())
    }

    /// Insert or overwrite the entry for its path
    pub fn add(&mut self, entry: IndexEntry) {
        if self.entries.get(&entry.name) != Some(&entry) {
            self.changed = true;
        }
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Stage a working-directory file
    ///
    /// Reads the file, stores it as a blob, upserts its entry and persists the
    /// index. Fails with `NotFound` if the file does not exist.
    pub fn add_file(
        &mut self,
        workspace: &Workspace,
        database: &Database,
        path: &Path,
    ) -> Result<ObjectId> {
        let name = IndexEntry::normalize_path(&workspace.relative_path(path)?)?;
        let data = workspace.read_file(Path::new(&name))?;
        let oid = database.write(&data, ObjectType::Blob)?;

        self.rehydrate()?;
        self.add(IndexEntry {
            name: name.clone(),
            oid: oid.clone(),
        });
        self.write_updates()?;

        debug!(path = %name, oid = %oid, "staged file");
        Ok(oid)
    }

    /// Drop every staged entry
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.changed = true;
        }
        self.entries.clear();
    }

    /// Persist all entries, sorted by path, replacing the file's content
    pub fn write_updates(&mut self) -> Result<()> {
        let content = self
            .entries
            .values()
            .map(IndexEntry::to_line)
            .collect::<String>();

        std::fs::write(self.path(), content)
            .map_err(|err| Error::from_io_at(err, self.path()))?;
        self.changed = false;

        Ok(())
    }

    /// Replace every staged entry with `entries` and persist them
    pub fn write(&mut self, entries: &BTreeMap<String, ObjectId>) -> Result<()> {
        self.entries = entries
            .iter()
            .map(|(path, oid)| {
                let entry = IndexEntry::try_new(Path::new(path), oid.clone())?;
                Ok((entry.name.clone(), entry))
            })
            .collect::<Result<_>>()?;

        self.write_updates()
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Union the staged entries with the previously committed tree
    ///
    /// A staged path always replaces the same path from `tree_entries`.
    /// Paths removed from the working directory stay in the result: deletions
    /// cannot be staged.
    pub fn merge_with_tree(
        &self,
        tree_entries: BTreeMap<String, ObjectId>,
    ) -> BTreeMap<String, ObjectId> {
        let mut merged = tree_entries;

        for entry in self.entries.values() {
            merged.insert(entry.name.clone(), entry.oid.clone());
        }

        merged
    }
}
