//! Building nested tree objects from flat path listings

pub mod tree_builder;
