//! Hierarchical tree construction
//!
//! Turns a flat `path -> blob` mapping into nested tree objects. Subtrees are
//! stored before their parents so every child digest is known when the parent
//! is encoded.

use crate::areas::database::Database;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use tracing::trace;

/// Node of the in-memory directory hierarchy
#[derive(Debug)]
enum Node {
    File(DatabaseEntry),
    Directory(BTreeMap<String, Node>),
}

#[derive(Debug)]
pub struct TreeBuilder<'db> {
    database: &'db Database,
}

impl<'db> TreeBuilder<'db> {
    pub fn new(database: &'db Database) -> Self {
        TreeBuilder { database }
    }

    /// Store the tree hierarchy for `entries` and return the root digest
    ///
    /// Every entry gets the regular file mode. An empty mapping yields the
    /// empty tree.
    pub fn build(&self, entries: &BTreeMap<String, ObjectId>) -> Result<ObjectId> {
        let entries = entries
            .iter()
            .map(|(path, oid)| (path.clone(), DatabaseEntry::new(oid.clone(), EntryMode::default())))
            .collect::<BTreeMap<_, _>>();

        self.build_with_modes(&entries)
    }

    /// Like [`TreeBuilder::build`], keeping the mode of every entry
    pub fn build_with_modes(&self, entries: &BTreeMap<String, DatabaseEntry>) -> Result<ObjectId> {
        let mut root = BTreeMap::new();

        for (path, entry) in entries {
            let segments = path.split('/').collect::<Vec<_>>();
            Self::add_entry(&mut root, path, &segments, entry)?;
        }

        self.store_directory(root)
    }

    fn add_entry(
        directory: &mut BTreeMap<String, Node>,
        path: &str,
        segments: &[&str],
        entry: &DatabaseEntry,
    ) -> Result<()> {
        match segments {
            [] => Err(Error::invalid_argument("cannot build a tree from an empty path")),
            [name] => match directory.get(*name) {
                Some(_) => Err(Self::conflict(path)),
                None => {
                    directory.insert(name.to_string(), Node::File(entry.clone()));
                    Ok(())
                }
            },
            [parent, rest @ ..] => {
                let node = directory
                    .entry(parent.to_string())
                    .or_insert_with(|| Node::Directory(BTreeMap::new()));

                match node {
                    Node::Directory(children) => Self::add_entry(children, path, rest, entry),
                    Node::File(_) => Err(Self::conflict(path)),
                }
            }
        }
    }

    /// Post-order: children are stored before the tree that lists them
    fn store_directory(&self, directory: BTreeMap<String, Node>) -> Result<ObjectId> {
        let mut tree_entries = Vec::with_capacity(directory.len());

        for (name, node) in directory {
            let tree_entry = match node {
                Node::File(entry) => TreeEntry::new(entry.mode, name, entry.oid),
                Node::Directory(children) => {
                    let oid = self.store_directory(children)?;
                    TreeEntry::new(EntryMode::Directory, name, oid)
                }
            };
            tree_entries.push(tree_entry);
        }

        let tree = Tree::new(tree_entries)?;
        let oid = self.database.store(&tree)?;
        trace!(oid = %oid, entries = tree.len(), "stored tree");

        Ok(oid)
    }

    fn conflict(path: &str) -> Error {
        Error::invalid_argument(format!("{path} is staged both as a file and as a directory"))
    }
}
