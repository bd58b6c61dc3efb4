use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;

/// Decompressed object with its parsed header
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RawObject {
    pub object_type: ObjectType,
    /// Content length declared in the header; always equal to `content.len()`
    pub length: usize,
    pub content: Bytes,
}
