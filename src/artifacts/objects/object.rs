use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

/// Encodes an object's content, without the object header
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decodes an object's content; the header has already been consumed
pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        hash_content(&content, self.object_type())
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Full stored byte form: `"{kind} {len}\0"` followed by the content
pub fn encode_object(content: &[u8], object_type: ObjectType) -> Bytes {
    let header = object_type.header(content.len());

    let mut object_bytes = Vec::with_capacity(header.len() + content.len());
    object_bytes.extend_from_slice(header.as_bytes());
    object_bytes.extend_from_slice(content);

    Bytes::from(object_bytes)
}

/// SHA-1 digest over the header and content
pub fn hash_content(content: &[u8], object_type: ObjectType) -> Result<ObjectId> {
    let mut hasher = Sha1::new();
    hasher.update(object_type.header(content.len()).as_bytes());
    hasher.update(content);

    ObjectId::from_digest(&hasher.finalize())
}

/// A decoded object, tagged with its kind
#[derive(Debug, Clone)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(blob) => blob.object_type(),
            ObjectBox::Tree(tree) => tree.object_type(),
            ObjectBox::Commit(commit) => commit.object_type(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
