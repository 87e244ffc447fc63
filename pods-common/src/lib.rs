//! # Pods Common Library
//!
//! Shared code for all pod crates including:
//! - Document graph model (`DocumentNode` and its custom metadata)
//! - The `NoteStore` contract with in-memory and SQLite implementations
//! - Bootstrap configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod notes;

pub use error::{Error, Result};
pub use notes::{DocumentNode, MemoryNoteStore, NoteCustom, NoteStore, WriteOptions};
