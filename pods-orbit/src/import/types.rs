// Shared types passed between the import stages
//
// planner -> (applier, resolver) -> pipeline report

use chrono::{DateTime, Utc};
use pods_common::notes::{DocumentNode, NoteCustom, SocialHandles, SocialKey};
use serde::{Deserialize, Serialize};

/// Key of the provider bag inside a node's custom metadata
pub const ORBIT_KEY: &str = "orbit";

/// Provider bag stored under `custom.orbit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitAttributes {
    /// Orbit member id
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub last_imported_at: DateTime<Utc>,
}

impl OrbitAttributes {
    /// Read the bag from a node, `None` when absent or not in this shape
    pub fn from_custom(custom: &NoteCustom) -> Option<Self> {
        custom
            .get(ORBIT_KEY)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn write_to(&self, custom: &mut NoteCustom) {
        // Serializing plain strings/vecs/timestamps cannot fail
        if let Ok(value) = serde_json::to_value(self) {
            custom.insert(ORBIT_KEY, value);
        }
    }

    /// Equal apart from `last_imported_at`
    pub fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.url == other.url
            && self.slug == other.slug
            && self.company == other.company
            && self.title == other.title
            && self.location == other.location
            && self.tags == other.tags
    }
}

/// Record attributes projected into node metadata
#[derive(Debug, Clone, PartialEq)]
pub struct MappedMetadata {
    pub social: SocialHandles,
    pub orbit: OrbitAttributes,
}

impl MappedMetadata {
    /// Custom section for a brand-new node
    pub fn to_custom(&self) -> NoteCustom {
        let mut custom = NoteCustom {
            social: Some(self.social.clone()),
            ..Default::default()
        };
        self.orbit.write_to(&mut custom);
        custom
    }
}

/// Existing node whose stored values do not conflict with the incoming record
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub node: DocumentNode,
    pub incoming: MappedMetadata,
}

/// Existing node that disagrees with the incoming record
#[derive(Debug, Clone)]
pub struct ConflictEntry {
    /// The node currently in the store
    pub conflict_note: DocumentNode,
    /// Synthesized replacement, named under the quarantine prefix
    pub conflict_entry: DocumentNode,
    /// Disagreeing social keys, in canonical order
    pub conflict_data: Vec<SocialKey>,
}

impl ConflictEntry {
    /// The replacement node as it is written under `OverwriteLocal`:
    /// renamed back to the original name and bound to the original id
    pub fn into_overwrite(self) -> DocumentNode {
        let mut node = self.conflict_entry;
        node.id = self.conflict_note.id;
        node.fname = self.conflict_note.fname;
        node.created = self.conflict_note.created;
        node
    }
}

/// Planner output
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub to_create: Vec<DocumentNode>,
    pub to_update: Vec<PendingUpdate>,
    pub conflicts: Vec<ConflictEntry>,
    /// Target names claimed twice within the batch; later records were dropped
    pub duplicates: Vec<String>,
}

/// What happened to one queued conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictOutcome {
    Overwritten,
    Skipped,
    /// The entry on which `SkipAll` was chosen
    SkippedAll,
    /// Left behind after an earlier `SkipAll`
    NotVisited,
    /// The decision source gave no answer; handled as a skip
    Undecided,
}

/// Resolver output: one node and one outcome per queued conflict
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Replacement node for overwritten entries, original node otherwise
    pub resolved: Vec<DocumentNode>,
    pub outcomes: Vec<ConflictOutcome>,
}

impl Resolution {
    pub fn count(&self, outcome: ConflictOutcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub duplicates: usize,
    pub conflicts: usize,
    pub overwritten: usize,
    pub skipped: usize,
    pub undecided: usize,
    pub not_visited: usize,
}

/// Result of a full import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub created: Vec<DocumentNode>,
    pub resolved: Vec<DocumentNode>,
    pub outcomes: Vec<ConflictOutcome>,
    pub stats: ImportStats,
}

impl ImportReport {
    /// Created nodes followed by resolved nodes
    pub fn nodes(&self) -> Vec<&DocumentNode> {
        self.created.iter().chain(self.resolved.iter()).collect()
    }
}
