//! Commit applier: the only stage that writes to the note store
//!
//! - new nodes: one `bulk_create` call
//! - overwrite resolutions: one `update` call each
//! - non-conflicting updates: merged first, written only if something
//!   changed, dispatched concurrently

use super::types::{OrbitAttributes, PendingUpdate};
use crate::error::ImportResult;
use futures::stream::{self, StreamExt, TryStreamExt};
use pods_common::notes::{DocumentNode, NoteStore, WriteOptions, SOCIAL_KEYS};

pub const DEFAULT_UPDATE_CONCURRENCY: usize = 8;

/// Outcome of the non-conflicting update batch
#[derive(Debug, Clone, Default)]
pub struct UpdateSummary {
    /// Nodes that were written
    pub updated: Vec<DocumentNode>,
    /// Candidates that needed no write
    pub unchanged: usize,
}

pub struct CommitApplier<'a> {
    store: &'a dyn NoteStore,
    update_concurrency: usize,
}

impl<'a> CommitApplier<'a> {
    pub fn new(store: &'a dyn NoteStore) -> Self {
        Self {
            store,
            update_concurrency: DEFAULT_UPDATE_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, update_concurrency: usize) -> Self {
        self.update_concurrency = update_concurrency.max(1);
        self
    }

    /// Create all new nodes in one batch call
    pub async fn commit_creates(&self, nodes: &[DocumentNode]) -> ImportResult<()> {
        if nodes.is_empty() {
            return Ok(());
        }
        self.store.bulk_create(nodes).await?;
        tracing::info!(count = nodes.len(), "Created nodes");
        Ok(())
    }

    /// Write one node over the existing node of the same name
    pub async fn commit_update(&self, node: &DocumentNode) -> ImportResult<()> {
        self.store
            .update(node, WriteOptions::update_existing())
            .await?;
        tracing::debug!(fname = %node.fname, "Updated node");
        Ok(())
    }

    /// Merge and write the non-conflicting bucket
    ///
    /// Writes run concurrently (the nodes are disjoint). The first failing
    /// write fails the batch; writes already issued stay committed.
    pub async fn commit_updates(&self, updates: Vec<PendingUpdate>) -> ImportResult<UpdateSummary> {
        let total = updates.len();
        let changed: Vec<DocumentNode> = updates.into_iter().filter_map(merge_update).collect();
        let unchanged = total - changed.len();

        let updated: Vec<DocumentNode> = stream::iter(changed)
            .map(|node| async move {
                self.commit_update(&node).await?;
                Ok::<_, crate::error::ImportError>(node)
            })
            .buffer_unordered(self.update_concurrency)
            .try_collect()
            .await?;

        tracing::info!(updated = updated.len(), unchanged, "Applied non-conflicting updates");
        Ok(UpdateSummary { updated, unchanged })
    }
}

/// Fold incoming values into a non-conflicting node
///
/// Unset social handles adopt the incoming value while unknown social keys
/// are left in place; the orbit section is
/// replaced when any field other than `last_imported_at` differs. Returns
/// `None` when nothing changed, so repeated imports of the same data do not
/// write (and do not bump timestamps).
pub fn merge_update(update: PendingUpdate) -> Option<DocumentNode> {
    let PendingUpdate { mut node, incoming } = update;
    let mut changed = false;

    match node.custom.social.as_mut() {
        None => {
            if !incoming.social.is_empty() {
                node.custom.social = Some(incoming.social.clone());
                changed = true;
            }
        }
        Some(social) => {
            for key in SOCIAL_KEYS {
                if !social.is_set(key) {
                    if let Some(value) = incoming.social.get(key) {
                        social.set(key, Some(value.to_string()));
                        changed = true;
                    }
                }
            }
        }
    }

    let orbit_current = OrbitAttributes::from_custom(&node.custom)
        .map(|stored| stored.same_content(&incoming.orbit))
        .unwrap_or(false);

    if !orbit_current {
        changed = true;
    }

    if changed {
        incoming.orbit.write_to(&mut node.custom);
        Some(node)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::MappedMetadata;
    use chrono::{TimeZone, Utc};
    use pods_common::notes::{MemoryNoteStore, SocialHandles};

    fn orbit(company: Option<&str>, day: u32) -> OrbitAttributes {
        OrbitAttributes {
            id: "m1".to_string(),
            url: None,
            slug: None,
            company: company.map(str::to_string),
            title: None,
            location: None,
            tags: vec![],
            last_imported_at: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
        }
    }

    fn node_with(social: Option<SocialHandles>, stored_orbit: Option<OrbitAttributes>) -> DocumentNode {
        let mut node = DocumentNode::new("people.alice", "main", "Alice");
        node.custom.social = social;
        if let Some(o) = stored_orbit {
            o.write_to(&mut node.custom);
        }
        node
    }

    fn github(value: Option<&str>) -> SocialHandles {
        SocialHandles {
            github: value.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_unset_field_is_adopted() {
        let update = PendingUpdate {
            node: node_with(Some(github(None)), Some(orbit(None, 1))),
            incoming: MappedMetadata {
                social: github(Some("alice")),
                orbit: orbit(None, 2),
            },
        };

        let merged = merge_update(update).expect("should change");
        assert_eq!(merged.custom.social.as_ref().unwrap().github.as_deref(), Some("alice"));
        assert_eq!(
            OrbitAttributes::from_custom(&merged.custom).unwrap().last_imported_at,
            orbit(None, 2).last_imported_at
        );
    }

    #[test]
    fn test_identical_data_is_a_no_op() {
        let update = PendingUpdate {
            node: node_with(Some(github(Some("alice"))), Some(orbit(Some("Acme"), 1))),
            incoming: MappedMetadata {
                social: github(Some("alice")),
                orbit: orbit(Some("Acme"), 2),
            },
        };
        assert!(merge_update(update).is_none());
    }

    #[test]
    fn test_changed_profile_field_refreshes_orbit_section() {
        let update = PendingUpdate {
            node: node_with(Some(github(Some("alice"))), Some(orbit(Some("Acme"), 1))),
            incoming: MappedMetadata {
                social: github(Some("alice")),
                orbit: orbit(Some("Globex"), 2),
            },
        };
        let merged = merge_update(update).expect("should change");
        assert_eq!(
            OrbitAttributes::from_custom(&merged.custom).unwrap().company.as_deref(),
            Some("Globex")
        );
    }

    #[test]
    fn test_unknown_social_key_survives_merge() {
        let mut node = node_with(None, Some(orbit(None, 1)));
        node.custom.social = Some(
            serde_json::from_value(serde_json::json!({ "github": null, "mastodon": "@alice@x" }))
                .unwrap(),
        );
        let update = PendingUpdate {
            node,
            incoming: MappedMetadata {
                social: github(Some("alice")),
                orbit: orbit(None, 2),
            },
        };

        let merged = merge_update(update).expect("should change");
        let social = merged.custom.social.unwrap();
        assert_eq!(social.github.as_deref(), Some("alice"));
        assert_eq!(social.extra.get("mastodon"), Some(&serde_json::json!("@alice@x")));
    }

    #[test]
    fn test_missing_social_section_takes_incoming() {
        let update = PendingUpdate {
            node: node_with(None, Some(orbit(None, 1))),
            incoming: MappedMetadata {
                social: github(Some("alice")),
                orbit: orbit(None, 2),
            },
        };
        let merged = merge_update(update).expect("should change");
        assert_eq!(merged.custom.social, Some(github(Some("alice"))));
    }

    #[tokio::test]
    async fn test_commit_updates_skips_no_ops() {
        let changed = node_with(Some(github(None)), Some(orbit(None, 1)));
        let mut same = node_with(Some(github(Some("carol"))), Some(orbit(None, 1)));
        same.fname = "people.carol".to_string();
        let store = MemoryNoteStore::with_nodes([changed.clone(), same.clone()]);

        let applier = CommitApplier::new(&store).with_concurrency(2);
        let summary = applier
            .commit_updates(vec![
                PendingUpdate {
                    node: changed,
                    incoming: MappedMetadata {
                        social: github(Some("alice")),
                        orbit: orbit(None, 2),
                    },
                },
                PendingUpdate {
                    node: same,
                    incoming: MappedMetadata {
                        social: github(Some("carol")),
                        orbit: orbit(None, 2),
                    },
                },
            ])
            .await
            .unwrap();

        assert_eq!(summary.updated.len(), 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_creates_empty_batch_is_skipped() {
        let store = MemoryNoteStore::new();
        CommitApplier::new(&store).commit_creates(&[]).await.unwrap();
        assert_eq!(store.write_count(), 0);
    }
}
