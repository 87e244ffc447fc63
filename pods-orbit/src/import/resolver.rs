//! Sequential conflict resolver
//!
//! Walks the conflict queue strictly in order, one question in flight at a
//! time. State is the queue position plus the nodes resolved so far.
//!
//! | decision         | effect                                            |
//! |------------------|---------------------------------------------------|
//! | `OverwriteLocal` | rename entry to the original name, write it       |
//! | `Skip`           | drop the entry, keep the stored node              |
//! | `SkipAll`        | drop this and every remaining entry, stop         |
//! | none             | handled like `Skip`, counted as undecided         |

use super::applier::CommitApplier;
use super::types::{ConflictEntry, ConflictOutcome, Resolution};
use crate::decision::DecisionProvider;
use crate::error::ImportResult;
use crate::models::ResolutionPolicy;

pub struct ConflictResolver<'a> {
    applier: &'a CommitApplier<'a>,
    decisions: &'a dyn DecisionProvider,
    overwrite_all: bool,
}

impl<'a> ConflictResolver<'a> {
    pub fn new(applier: &'a CommitApplier<'a>, decisions: &'a dyn DecisionProvider) -> Self {
        Self {
            applier,
            decisions,
            overwrite_all: false,
        }
    }

    /// Overwrite every conflict without consulting the decision provider
    pub fn overwrite_all(mut self, overwrite_all: bool) -> Self {
        self.overwrite_all = overwrite_all;
        self
    }

    /// Drain the queue
    ///
    /// Returns one resolved node per queued entry: the written replacement
    /// for overwritten entries, the untouched stored node for everything
    /// else (including entries never visited because of `SkipAll`).
    pub async fn resolve(&self, queue: Vec<ConflictEntry>) -> ImportResult<Resolution> {
        let total = queue.len();
        let mut resolution = Resolution::default();
        let mut pending = queue.into_iter();
        let mut index = 0usize;

        while let Some(entry) = pending.next() {
            let decision = if self.overwrite_all {
                Some(ResolutionPolicy::OverwriteLocal)
            } else {
                self.decisions.decide(&entry, &ResolutionPolicy::MENU).await?
            };

            tracing::debug!(
                position = index + 1,
                total,
                fname = %entry.conflict_note.fname,
                decision = ?decision,
                "Resolving conflict"
            );

            match decision {
                Some(ResolutionPolicy::OverwriteLocal) => {
                    let node = entry.into_overwrite();
                    self.applier.commit_update(&node).await?;
                    resolution.resolved.push(node);
                    resolution.outcomes.push(ConflictOutcome::Overwritten);
                }
                Some(ResolutionPolicy::Skip) => {
                    resolution.resolved.push(entry.conflict_note);
                    resolution.outcomes.push(ConflictOutcome::Skipped);
                }
                Some(ResolutionPolicy::SkipAll) => {
                    resolution.resolved.push(entry.conflict_note);
                    resolution.outcomes.push(ConflictOutcome::SkippedAll);

                    let remaining = total - index - 1;
                    for rest in pending.by_ref() {
                        resolution.resolved.push(rest.conflict_note);
                        resolution.outcomes.push(ConflictOutcome::NotVisited);
                    }
                    tracing::info!(remaining, "Skipping all remaining conflicts");
                    break;
                }
                None => {
                    tracing::warn!(
                        fname = %entry.conflict_note.fname,
                        "No decision for conflict, leaving local node unchanged"
                    );
                    resolution.resolved.push(entry.conflict_note);
                    resolution.outcomes.push(ConflictOutcome::Undecided);
                }
            }

            index += 1;
        }

        tracing::info!(
            total,
            overwritten = resolution.count(ConflictOutcome::Overwritten),
            skipped = resolution.count(ConflictOutcome::Skipped)
                + resolution.count(ConflictOutcome::SkippedAll),
            not_visited = resolution.count(ConflictOutcome::NotVisited),
            undecided = resolution.count(ConflictOutcome::Undecided),
            "Conflict resolution finished"
        );
        Ok(resolution)
    }
}
