//! Note store contract
//!
//! Pods never touch storage directly; every read and write goes through
//! this trait. Nodes are addressed by `(vault, fname)`. Each call is atomic
//! on its own and the last writer wins per node.

use super::model::DocumentNode;
use crate::Result;
use async_trait::async_trait;

/// Options for [`NoteStore::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Replace a node that already has the same name instead of failing
    pub update_existing: bool,
}

impl WriteOptions {
    pub fn update_existing() -> Self {
        Self {
            update_existing: true,
        }
    }
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Find a node by exact name within a vault
    async fn lookup_by_name(&self, fname: &str, vault: &str) -> Result<Option<DocumentNode>>;

    /// Create a single node; fails with `AlreadyExists` if the name is taken
    async fn create(&self, node: &DocumentNode) -> Result<()>;

    /// Create many nodes in one call
    ///
    /// All-or-nothing: if any name is taken (or repeated within `nodes`)
    /// nothing is written.
    async fn bulk_create(&self, nodes: &[DocumentNode]) -> Result<()>;

    /// Write a node
    ///
    /// With `update_existing` the node replaces whatever currently has its
    /// name (keeping the stored id and creation time), or is created if the
    /// name is free. Without it this behaves like [`NoteStore::create`].
    async fn update(&self, node: &DocumentNode, opts: WriteOptions) -> Result<()>;

    /// All nodes in a vault, ordered by name
    async fn list(&self, vault: &str) -> Result<Vec<DocumentNode>>;
}
