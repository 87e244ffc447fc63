//! End-to-end import run
//!
//! fetch → plan → non-conflicting updates (concurrent) → conflict queue
//! (sequential) → bulk create → report
//!
//! A run either completes or aborts on the first error. Writes issued
//! before the failure stay committed.

use super::applier::{CommitApplier, DEFAULT_UPDATE_CONCURRENCY};
use super::planner::{PlanContext, Planner};
use super::resolver::ConflictResolver;
use super::types::{ConflictOutcome, ImportReport, ImportStats};
use crate::decision::DecisionProvider;
use crate::error::ImportResult;
use crate::models::OrbitMember;
use crate::services::MemberSource;
use chrono::{DateTime, Utc};
use pods_common::notes::NoteStore;
use std::time::Instant;

/// Per-run options
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Vault new nodes go into and lookups are scoped to
    pub vault: String,
    /// Fixed target name for every record
    pub dest_name: Option<String>,
    /// Resolve every conflict as `OverwriteLocal` without asking
    pub overwrite_all: bool,
    /// Import only this member instead of the whole workspace
    pub member_id: Option<String>,
    /// Upper bound on in-flight non-conflicting updates
    pub update_concurrency: usize,
}

impl ImportOptions {
    pub fn new(vault: impl Into<String>) -> Self {
        Self {
            vault: vault.into(),
            dest_name: None,
            overwrite_all: false,
            member_id: None,
            update_concurrency: DEFAULT_UPDATE_CONCURRENCY,
        }
    }
}

pub struct OrbitImportPipeline<'a> {
    source: &'a dyn MemberSource,
    store: &'a dyn NoteStore,
    decisions: &'a dyn DecisionProvider,
    options: ImportOptions,
}

impl<'a> OrbitImportPipeline<'a> {
    pub fn new(
        source: &'a dyn MemberSource,
        store: &'a dyn NoteStore,
        decisions: &'a dyn DecisionProvider,
        options: ImportOptions,
    ) -> Self {
        Self {
            source,
            store,
            decisions,
            options,
        }
    }

    pub async fn run(&self) -> ImportResult<ImportReport> {
        self.run_at(Utc::now()).await
    }

    /// Run with a fixed clock (import timestamps, quarantine date)
    pub async fn run_at(&self, now: DateTime<Utc>) -> ImportResult<ImportReport> {
        let started = Instant::now();
        tracing::info!(
            vault = %self.options.vault,
            member_id = ?self.options.member_id,
            dest_name = ?self.options.dest_name,
            overwrite_all = self.options.overwrite_all,
            "Starting Orbit import"
        );

        let members = self.fetch().await?;

        let ctx = PlanContext {
            vault: self.options.vault.clone(),
            dest_name: self.options.dest_name.clone(),
            now,
        };
        let plan = Planner::new(self.store, ctx).plan(&members).await?;

        let mut stats = ImportStats {
            fetched: members.len(),
            duplicates: plan.duplicates.len(),
            conflicts: plan.conflicts.len(),
            ..Default::default()
        };

        let applier =
            CommitApplier::new(self.store).with_concurrency(self.options.update_concurrency);

        let summary = applier.commit_updates(plan.to_update).await?;
        stats.updated = summary.updated.len();
        stats.unchanged = summary.unchanged;

        let resolution = ConflictResolver::new(&applier, self.decisions)
            .overwrite_all(self.options.overwrite_all)
            .resolve(plan.conflicts)
            .await?;
        stats.overwritten = resolution.count(ConflictOutcome::Overwritten);
        stats.skipped = resolution.count(ConflictOutcome::Skipped)
            + resolution.count(ConflictOutcome::SkippedAll);
        stats.not_visited = resolution.count(ConflictOutcome::NotVisited);
        stats.undecided = resolution.count(ConflictOutcome::Undecided);

        applier.commit_creates(&plan.to_create).await?;
        stats.created = plan.to_create.len();

        tracing::info!(
            fetched = stats.fetched,
            created = stats.created,
            updated = stats.updated,
            unchanged = stats.unchanged,
            conflicts = stats.conflicts,
            overwritten = stats.overwritten,
            skipped = stats.skipped,
            duration_ms = started.elapsed().as_millis() as u64,
            "Orbit import complete"
        );

        Ok(ImportReport {
            created: plan.to_create,
            resolved: resolution.resolved,
            outcomes: resolution.outcomes,
            stats,
        })
    }

    async fn fetch(&self) -> ImportResult<Vec<OrbitMember>> {
        match &self.options.member_id {
            Some(id) => Ok(vec![self.source.fetch_single(id).await?]),
            None => self.source.fetch_all().await,
        }
    }
}
