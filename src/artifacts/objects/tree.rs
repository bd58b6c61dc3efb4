//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Canonical order
//!
//! Entries are sorted by the raw bytes of their name, where a subtree name is
//! compared as if it ended in `/`. So `foo.txt` sorts before a directory `foo`
//! (`foo/`), while a file `foo` sorts before `foo.txt`. Any insertion order of
//! the same entry set encodes to identical bytes.

use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeSet;
use std::io::{BufRead, Write};

/// A single named entry of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    pub fn object_type(&self) -> ObjectType {
        if self.is_tree() {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }

    /// Sort key: name bytes, with subtrees treated as ending in `/`
    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.name.as_bytes().to_vec();
        if self.is_tree() {
            key.push(b'/');
        }
        key
    }

    fn validate_name(&self) -> Result<()> {
        if matches!(self.name.as_str(), "" | "." | "..")
            || self.name.contains('/')
            || self.name.contains('\0')
        {
            return Err(Error::invalid_argument(format!(
                "tree entry name must be a single path segment, got {:?}",
                self.name
            )));
        }

        Ok(())
    }
}

/// Directory listing sorted in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries given in any order
    ///
    /// Fails with `InvalidArgument` for names that are not a single path
    /// segment or that appear twice.
    pub fn new(mut entries: Vec<TreeEntry>) -> Result<Self> {
        {
            let mut names = BTreeSet::new();
            for entry in &entries {
                entry.validate_name()?;
                if !names.insert(entry.name.as_str()) {
                    return Err(Error::invalid_argument(format!(
                        "duplicate tree entry {:?}",
                        entry.name
                    )));
                }
            }
        }

        entries.sort_by_cached_key(TreeEntry::sort_key);

        Ok(Tree { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = TreeEntry> {
        self.entries.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content_bytes = Vec::new();

        for entry in &self.entries {
            write!(content_bytes, "{} {}", entry.mode.as_str(), entry.name)?;
            content_bytes.push(0);
            entry.oid.write_h40_to(&mut content_bytes)?;
        }

        Ok(Bytes::from(content_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut entries = Vec::new();

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break; // clean EOF: no more entries
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(Error::corrupt("unexpected EOF in tree entry mode"));
            }

            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| Error::corrupt("tree entry mode is not valid UTF-8"))?;
            let mode = EntryMode::from_octal_str(mode)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(Error::corrupt("unexpected EOF in tree entry name"));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| Error::corrupt("tree entry name is not valid UTF-8"))?;

            let oid = ObjectId::read_h40_from(&mut reader)?;

            let entry = TreeEntry::new(mode, name, oid);
            entry
                .validate_name()
                .map_err(|_| Error::corrupt(format!("invalid tree entry name {:?}", entry.name)))?;
            entries.push(entry);
        }

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\t{}",
                    entry.mode.as_str(),
                    entry.object_type().as_str(),
                    entry.oid,
                    entry.name
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::entry_mode::FileMode;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    const BLOB_OID: &str = "557db03de997c86a4a028e1ebd3a1ceb225be238";
    const TREE_OID: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    fn file(name: &str) -> TreeEntry {
        TreeEntry::new(
            FileMode::Regular.into(),
            name.to_string(),
            ObjectId::try_parse(BLOB_OID.to_string()).unwrap(),
        )
    }

    fn dir(name: &str) -> TreeEntry {
        TreeEntry::new(
            EntryMode::Directory,
            name.to_string(),
            ObjectId::try_parse(TREE_OID.to_string()).unwrap(),
        )
    }

    #[fixture]
    fn mixed_entries() -> Vec<TreeEntry> {
        vec![dir("foo"), file("foo.txt"), file("bar"), file("foo-bar")]
    }

    #[rstest]
    fn directories_sort_as_if_suffixed_with_separator(mixed_entries: Vec<TreeEntry>) {
        let tree = Tree::new(mixed_entries).unwrap();

        let names = tree.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        // '-' (0x2d) < '.' (0x2e) < '/' (0x2f)
        assert_eq!(names, vec!["bar", "foo-bar", "foo.txt", "foo"]);
    }

    #[test]
    fn file_sorts_before_longer_name_with_same_prefix() {
        let tree = Tree::new(vec![file("foo.txt"), file("foo")]).unwrap();

        let names = tree.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["foo", "foo.txt"]);
    }

    #[test]
    fn single_entry_encoding_matches_wire_format() {
        let tree = Tree::new(vec![file("test.txt")]).unwrap();
        let bytes = tree.serialize().unwrap();

        let mut expected = b"100644 test.txt\0".to_vec();
        ObjectId::try_parse(BLOB_OID.to_string())
            .unwrap()
            .write_h40_to(&mut expected)
            .unwrap();
        assert_eq!(bytes.to_vec(), expected);
    }

    #[rstest]
    fn decoding_recovers_entries(mixed_entries: Vec<TreeEntry>) {
        let tree = Tree::new(mixed_entries).unwrap();
        let bytes = tree.serialize().unwrap();

        let decoded = Tree::deserialize(Cursor::new(bytes)).unwrap();

        assert_eq!(decoded, tree);
    }

    #[rstest]
    #[case(b"100644 test.txt".as_slice())]
    #[case(b"100644".as_slice())]
    #[case(b"100644 test.txt\0\x55\x7d".as_slice())]
    fn truncated_encoding_is_corrupt(#[case] data: &[u8]) {
        let result = Tree::deserialize(Cursor::new(data));

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[rstest]
    #[case("a/b")]
    #[case("")]
    #[case(".")]
    #[case("..")]
    fn invalid_names_are_rejected(#[case] name: &str) {
        let result = Tree::new(vec![file(name)]);

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[rstest]
    #[case("..")]
    #[case(".")]
    fn decoding_rejects_names_leaving_the_directory(#[case] name: &str) {
        let mut data = format!("40000 {name}\0").into_bytes();
        ObjectId::try_parse(TREE_OID.to_string())
            .unwrap()
            .write_h40_to(&mut data)
            .unwrap();

        let result = Tree::deserialize(Cursor::new(data));

        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Tree::new(vec![file("a"), file("a")]);

        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn display_lists_mode_kind_oid_and_name() {
        let tree = Tree::new(vec![dir("src"), file("README")]).unwrap();

        assert_eq!(
            tree.display(),
            format!("100644 blob {BLOB_OID}\tREADME\n40000 tree {TREE_OID}\tsrc")
        );
    }

    proptest! {
        #[test]
        fn insertion_order_does_not_change_encoding(
            names in proptest::collection::btree_set("[a-z][a-z.\\-]{0,7}", 1..12),
            seed in any::<u64>(),
        ) {
            let entries = names
                .iter()
                .enumerate()
                .map(|(i, name)| if i % 3 == 0 { dir(name) } else { file(name) })
                .collect::<Vec<_>>();

            let mut shuffled = entries.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            let first = Tree::new(entries).unwrap();
            let second = Tree::new(shuffled).unwrap();

            prop_assert_eq!(first.serialize().unwrap(), second.serialize().unwrap());
            prop_assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        }
    }
}
