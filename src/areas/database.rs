//! Object database
//!
//! Stores zlib-compressed objects under `objects/<xx>/<rest>`, addressed by the
//! SHA-1 digest of `"{kind} {len}\0{content}"`. Objects are immutable: writing
//! content that is already stored is a no-op.

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::database::raw_object::RawObject;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{
    Object, ObjectBox, Unpackable, encode_object, hash_content,
};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

// TODO: write through a temp file and rename into place so a killed process
// cannot leave a truncated object behind
impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Digest of `content` stored as `object_type`; no I/O
    pub fn hash(&self, content: &[u8], object_type: ObjectType) -> Result<ObjectId> {
        hash_content(content, object_type)
    }

    /// Store `content` as `object_type` unless an object with that digest exists
    pub fn write(&self, content: &[u8], object_type: ObjectType) -> Result<ObjectId> {
        let object_id = self.hash(content, object_type)?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            trace!(oid = %object_id, kind = %object_type, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::corrupt(format!("invalid object path {}", object_path.display())))?;
        std::fs::create_dir_all(object_dir)?;

        let compressed = Self::compress(&encode_object(content, object_type))?;
        std::fs::write(&object_path, compressed)?;

        debug!(oid = %object_id, kind = %object_type, size = content.len(), "stored object");
        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.write(&object.serialize()?, object.object_type())
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Load, decompress and validate the object stored at `object_id`
    pub fn read(&self, object_id: &ObjectId) -> Result<RawObject> {
        let object_path = self.path.join(object_id.to_path());
        let object_content = self.read_object(&object_path).map_err(|err| match err {
            Error::NotFound(_) => Error::not_found(format!("object {object_id}")),
            err => err,
        })?;

        let mut object_reader = Cursor::new(object_content);
        let (object_type, length) = ObjectType::parse_header(&mut object_reader)?;

        let start = object_reader.position() as usize;
        let content = object_reader.into_inner().slice(start..);

        if content.len() != length {
            return Err(Error::corrupt(format!(
                "object {} declares {} bytes but holds {}",
                object_id,
                length,
                content.len()
            )));
        }

        Ok(RawObject::new(object_type, length, content))
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let raw = self.read(object_id)?;
        let reader = Cursor::new(raw.content);

        match raw.object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(reader)?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> Result<Option<Blob>> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => Ok(Some(*tree)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    /// Like [`Database::parse_object_as_tree`], but a non-tree is `Corrupt`
    pub fn load_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        self.parse_object_as_tree(object_id)?
            .ok_or_else(|| Error::corrupt(format!("object {object_id} is not a tree")))
    }

    /// Recursively flatten a tree into `path -> entry`, paths joined with `/`
    ///
    /// Only leaves (blobs) appear in the result.
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> Result<BTreeMap<String, DatabaseEntry>> {
        let mut entries = BTreeMap::new();
        self.flatten_tree_into(tree_oid, None, &mut entries)?;

        Ok(entries)
    }

    fn flatten_tree_into(
        &self,
        tree_oid: &ObjectId,
        prefix: Option<&str>,
        entries: &mut BTreeMap<String, DatabaseEntry>,
    ) -> Result<()> {
        for entry in self.load_tree(tree_oid)?.into_entries() {
            let is_tree = entry.is_tree();
            let path = match prefix {
                Some(prefix) => format!("{prefix}/{}", entry.name),
                None => entry.name,
            };

            if is_tree {
                trace!(path = %path, oid = %entry.oid, "descending into subtree");
                self.flatten_tree_into(&entry.oid, Some(&path), entries)?;
            } else {
                entries.insert(path, DatabaseEntry::new(entry.oid, entry.mode));
            }
        }

        Ok(())
    }

    fn read_object(&self, object_path: &Path) -> Result<Bytes> {
        let object_content =
            std::fs::read(object_path).map_err(|err| Error::from_io_at(err, object_path))?;

        Self::decompress(&object_content)
    }

    fn compress(data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;

        Ok(encoder.finish()?)
    }

    fn decompress(data: &[u8]) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|err| Error::corrupt(format!("unable to decompress object: {err}")))?;

        Ok(decompressed_content.into())
    }
}
