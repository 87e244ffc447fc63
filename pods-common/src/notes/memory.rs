//! In-memory note store

use super::model::DocumentNode;
use super::store::{NoteStore, WriteOptions};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

type NodeKey = (String, String);

fn key_of(node: &DocumentNode) -> NodeKey {
    (node.vault.clone(), node.fname.clone())
}

/// Note store backed by a map, for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryNoteStore {
    nodes: RwLock<BTreeMap<NodeKey, DocumentNode>>,
    writes: AtomicUsize,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `nodes`
    pub fn with_nodes(nodes: impl IntoIterator<Item = DocumentNode>) -> Self {
        let map = nodes.into_iter().map(|n| (key_of(&n), n)).collect();
        Self {
            nodes: RwLock::new(map),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of nodes written through this store (creates and updates)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn lookup_by_name(&self, fname: &str, vault: &str) -> Result<Option<DocumentNode>> {
        let nodes = self.nodes.read().await;
        Ok(nodes.get(&(vault.to_string(), fname.to_string())).cloned())
    }

    async fn create(&self, node: &DocumentNode) -> Result<()> {
        let mut nodes = self.nodes.write().await;
        let key = key_of(node);
        if nodes.contains_key(&key) {
            return Err(Error::AlreadyExists(format!("{} in vault {}", node.fname, node.vault)));
        }
        nodes.insert(key, node.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn bulk_create(&self, batch: &[DocumentNode]) -> Result<()> {
        let mut nodes = self.nodes.write().await;

        let mut seen = HashSet::new();
        for node in batch {
            let key = key_of(node);
            if nodes.contains_key(&key) || !seen.insert(key) {
                return Err(Error::AlreadyExists(format!("{} in vault {}", node.fname, node.vault)));
            }
        }

        for node in batch {
            nodes.insert(key_of(node), node.clone());
        }
        self.writes.fetch_add(batch.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, node: &DocumentNode, opts: WriteOptions) -> Result<()> {
        if !opts.update_existing {
            return self.create(node).await;
        }

        let mut nodes = self.nodes.write().await;
        let key = key_of(node);
        let mut stored = node.clone();
        if let Some(existing) = nodes.get(&key) {
            stored.id = existing.id;
            stored.created = existing.created;
        }
        stored.updated = Utc::now();
        nodes.insert(key, stored);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self, vault: &str) -> Result<Vec<DocumentNode>> {
        let nodes = self.nodes.read().await;
        Ok(nodes
            .iter()
            .filter(|((v, _), _)| v == vault)
            .map(|(_, n)| n.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryNoteStore::new();
        let node = DocumentNode::new("people.alice", "main", "Alice");
        store.create(&node).await.unwrap();

        let found = store.lookup_by_name("people.alice", "main").await.unwrap();
        assert_eq!(found, Some(node));
        assert!(store.lookup_by_name("people.alice", "other").await.unwrap().is_none());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_fails() {
        let store = MemoryNoteStore::new();
        store.create(&DocumentNode::new("a", "main", "A")).await.unwrap();
        let err = store.create(&DocumentNode::new("a", "main", "A")).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_bulk_create_is_all_or_nothing() {
        let store = MemoryNoteStore::with_nodes([DocumentNode::new("b", "main", "B")]);
        let batch = vec![
            DocumentNode::new("a", "main", "A"),
            DocumentNode::new("b", "main", "B"),
        ];

        assert!(store.bulk_create(&batch).await.is_err());
        assert!(store.lookup_by_name("a", "main").await.unwrap().is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_existing_keeps_identity() {
        let original = DocumentNode::new("people.bob", "main", "Bob");
        let store = MemoryNoteStore::with_nodes([original.clone()]);

        let mut replacement = DocumentNode::new("people.bob", "main", "Robert");
        replacement.body = "new body".to_string();
        store
            .update(&replacement, WriteOptions::update_existing())
            .await
            .unwrap();

        let stored = store.lookup_by_name("people.bob", "main").await.unwrap().unwrap();
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.created, original.created);
        assert_eq!(stored.title, "Robert");
        assert_eq!(stored.body, "new body");
    }

    #[tokio::test]
    async fn test_update_without_flag_behaves_like_create() {
        let store = MemoryNoteStore::with_nodes([DocumentNode::new("x", "main", "X")]);
        let result = store
            .update(&DocumentNode::new("x", "main", "X"), WriteOptions::default())
            .await;
        assert!(matches!(result, Err(Error::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_list_filters_by_vault_and_sorts() {
        let store = MemoryNoteStore::with_nodes([
            DocumentNode::new("people.zed", "main", "Zed"),
            DocumentNode::new("people.amy", "main", "Amy"),
            DocumentNode::new("people.amy", "other", "Amy"),
        ]);

        let names: Vec<String> = store
            .list("main")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.fname)
            .collect();
        assert_eq!(names, vec!["people.amy", "people.zed"]);
    }
}
