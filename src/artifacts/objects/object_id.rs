//! Object identifier (SHA-1 digest)
//!
//! Object IDs are kept as 40-character lowercase hexadecimal strings and
//! converted to their raw 20-byte form only inside tree entries.
//!
//! ## Storage
//!
//! Objects are stored in `.mingit/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, RAW_OBJECT_ID_LENGTH};
use crate::errors::{Error, Result};
use std::io;
use std::path::PathBuf;

/// Content digest identifying a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from its hexadecimal form
    ///
    /// Upper-case digits are accepted and normalised to lower case.
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(Error::invalid_argument(format!(
                "object ID must be {} hex characters, got {}: {:?}",
                OBJECT_ID_LENGTH,
                id.len(),
                id
            )));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::invalid_argument(format!(
                "invalid object ID characters: {}",
                id
            )));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Build an object ID from a raw 20-byte digest
    pub fn from_digest(digest: &[u8]) -> Result<Self> {
        if digest.len() != RAW_OBJECT_ID_LENGTH {
            return Err(Error::invalid_argument(format!(
                "raw digest must be {} bytes, got {}",
                RAW_OBJECT_ID_LENGTH,
                digest.len()
            )));
        }

        Ok(Self(digest.iter().map(|byte| format!("{byte:02x}")).collect()))
    }

    /// Write the object ID in binary format (20 bytes)
    pub fn write_h40_to<W: io::Write>(&self, writer: &mut W) -> Result<()> {
        let hex40 = self.as_ref();

        for i in (0..OBJECT_ID_LENGTH).step_by(2) {
            // validated on construction, so every pair is a hex byte
            let byte = u8::from_str_radix(&hex40[i..i + 2], 16)
                .map_err(|_| Error::invalid_argument(format!("invalid hex digit in {hex40}")))?;
            writer.write_all(&[byte])?;
        }

        Ok(())
    }

    /// Read an object ID from binary format (20 bytes)
    ///
    /// Fails with `Corrupt` if the reader ends before all 20 bytes are read.
    pub fn read_h40_from<R: io::Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut digest = [0u8; RAW_OBJECT_ID_LENGTH];
        reader.read_exact(&mut digest).map_err(|err| match err.kind() {
            io::ErrorKind::UnexpectedEof => Error::corrupt("unexpected EOF in object id"),
            _ => Error::Io(err),
        })?;

        Self::from_digest(&digest)
    }

    /// Convert to file system path for object storage
    ///
    /// `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the digest
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_parse(s.trim().to_string())
    }
}
