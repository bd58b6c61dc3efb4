#![allow(dead_code)]

pub mod command;
pub mod file;

/// Digest of the blob `Hello World\n`
pub const HELLO_BLOB: &str = "557db03de997c86a4a028e1ebd3a1ceb225be238";

/// Digest of a tree holding only `100644 test.txt` -> [`HELLO_BLOB`]
pub const HELLO_TREE: &str = "1e6dbf97adb05c42dcb537cd717e368812dc23b5";
