use crate::errors::{Error, Result};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Canonical object header: `"{kind} {length}\0"`
    pub fn header(&self, length: usize) -> String {
        format!("{} {}\0", self.as_str(), length)
    }

    /// Parse an object header, leaving the reader positioned at the content
    ///
    /// Returns the kind and the declared content length.
    pub fn parse_header(data_reader: &mut impl BufRead) -> Result<(ObjectType, usize)> {
        let mut object_type = Vec::new();
        data_reader.read_until(b' ', &mut object_type)?;
        if object_type.pop() != Some(b' ') {
            return Err(Error::corrupt("object header is missing the kind separator"));
        }

        let object_type = std::str::from_utf8(&object_type)
            .map_err(|_| Error::corrupt("object kind is not valid UTF-8"))?;
        let object_type = ObjectType::try_from(object_type)?;

        let mut size = Vec::new();
        data_reader.read_until(b'\0', &mut size)?;
        if size.pop() != Some(b'\0') {
            return Err(Error::corrupt("object header is missing the null terminator"));
        }

        let size = std::str::from_utf8(&size)
            .ok()
            .and_then(|size| size.parse::<usize>().ok())
            .ok_or_else(|| Error::corrupt("object header has an invalid length"))?;

        Ok((object_type, size))
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(Error::corrupt(format!("unknown object type {value:?}"))),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
