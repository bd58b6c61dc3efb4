//! Database entry types
//!
//! Types returned when reading objects back from the database: the raw
//! decompressed object and the `(oid, mode)` pair a tree entry points at.

pub mod database_entry;
pub mod raw_object;
