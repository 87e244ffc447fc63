//! Reconciliation planner
//!
//! Sorts each incoming member into exactly one bucket:
//! - no node under the target name → new node to create
//! - node present, no conflicting fields → in-place update candidate
//! - node present with conflicts → queued [`ConflictEntry`]
//!
//! The planner only reads from the store; all writes happen later.

use super::conflict_detector::detect_conflicts;
use super::identity::resolve_name;
use super::mapper::map_attributes;
use super::types::{ConflictEntry, MappedMetadata, PendingUpdate, Plan};
use crate::error::ImportResult;
use crate::models::OrbitMember;
use chrono::{DateTime, Utc};
use pods_common::notes::{DocumentNode, NoteStore};
use std::collections::HashSet;

/// Hierarchy prefix for imported people
pub const PEOPLE_PREFIX: &str = "people";
/// Hierarchy prefix for quarantined conflict entries
pub const QUARANTINE_PREFIX: &str = "people.orbit.duplicate";

/// Run-level inputs for planning
#[derive(Debug, Clone)]
pub struct PlanContext {
    /// Vault all lookups and new nodes belong to
    pub vault: String,
    /// Fixed target name for every record, bypassing derived naming
    pub dest_name: Option<String>,
    /// Run clock: import timestamp and quarantine date
    pub now: DateTime<Utc>,
}

impl PlanContext {
    pub fn new(vault: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            vault: vault.into(),
            dest_name: None,
            now,
        }
    }

    fn target_name(&self, name: &str) -> String {
        match &self.dest_name {
            Some(dest) => dest.clone(),
            None => format!("{}.{}", PEOPLE_PREFIX, name),
        }
    }

    fn quarantine_name(&self, name: &str) -> String {
        format!("{}.{}.{}", QUARANTINE_PREFIX, self.now.format("%Y.%m.%d"), name)
    }
}

pub struct Planner<'a> {
    store: &'a dyn NoteStore,
    ctx: PlanContext,
}

impl<'a> Planner<'a> {
    pub fn new(store: &'a dyn NoteStore, ctx: PlanContext) -> Self {
        Self { store, ctx }
    }

    /// Partition `members` into create / update / conflict buckets
    ///
    /// Order within each bucket follows the input order.
    pub async fn plan(&self, members: &[OrbitMember]) -> ImportResult<Plan> {
        let mut plan = Plan::default();
        let mut claimed: HashSet<String> = HashSet::new();

        for member in members {
            let name = resolve_name(member);
            let target = self.ctx.target_name(&name);

            if !claimed.insert(target.clone()) {
                tracing::warn!(
                    member_id = %member.id,
                    target = %target,
                    "Another member in this batch already maps to this name, skipping"
                );
                plan.duplicates.push(target);
                continue;
            }

            let incoming = map_attributes(member, self.ctx.now);

            match self.store.lookup_by_name(&target, &self.ctx.vault).await? {
                None => {
                    tracing::debug!(member_id = %member.id, target = %target, "New node");
                    plan.to_create
                        .push(self.new_node(member, &name, &target, &incoming));
                }
                Some(existing) => {
                    let conflict_data =
                        detect_conflicts(&existing.custom, &incoming.social);

                    if conflict_data.is_empty() {
                        plan.to_update.push(PendingUpdate {
                            node: existing,
                            incoming,
                        });
                    } else {
                        let quarantine = self.free_quarantine_name(&name).await?;
                        tracing::info!(
                            target = %target,
                            quarantine = %quarantine,
                            fields = ?conflict_data,
                            "Conflict queued"
                        );
                        let conflict_entry = replacement_node(&existing, quarantine, &incoming);
                        plan.conflicts.push(ConflictEntry {
                            conflict_note: existing,
                            conflict_entry,
                            conflict_data,
                        });
                    }
                }
            }
        }

        tracing::info!(
            create = plan.to_create.len(),
            update = plan.to_update.len(),
            conflicts = plan.conflicts.len(),
            duplicates = plan.duplicates.len(),
            "Planned import"
        );
        Ok(plan)
    }

    fn new_node(
        &self,
        member: &OrbitMember,
        name: &str,
        target: &str,
        incoming: &MappedMetadata,
    ) -> DocumentNode {
        let title = member.display_name().unwrap_or_else(|| name.to_string());
        let mut node = DocumentNode::new(target, &self.ctx.vault, title);
        node.custom = incoming.to_custom();
        node.created = self.ctx.now;
        node.updated = self.ctx.now;
        node
    }

    /// Quarantine name not used by any stored node (`-1`, `-2`, … appended if needed)
    async fn free_quarantine_name(&self, name: &str) -> ImportResult<String> {
        let base = self.ctx.quarantine_name(name);
        let mut candidate = base.clone();
        let mut suffix = 0u32;

        while self
            .store
            .lookup_by_name(&candidate, &self.ctx.vault)
            .await?
            .is_some()
        {
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }
        Ok(candidate)
    }
}

/// Synthesize the replacement for a conflicting node
///
/// Keeps the stored title, body and any foreign metadata, including social
/// keys the import does not manage; the known handles and the orbit section
/// come from the incoming record.
fn replacement_node(
    existing: &DocumentNode,
    quarantine: String,
    incoming: &MappedMetadata,
) -> DocumentNode {
    let mut node = DocumentNode::new(quarantine, &existing.vault, &existing.title);
    node.body = existing.body.clone();
    node.custom = existing.custom.clone();
    let mut social = existing.custom.social.clone().unwrap_or_default();
    social.overlay(&incoming.social);
    node.custom.social = Some(social);
    incoming.orbit.write_to(&mut node.custom);
    node
}
