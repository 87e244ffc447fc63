//! Orbit import pipeline
//!
//! Stages, leaf first:
//! - [`identity`]: record → canonical node name
//! - [`mapper`]: record → `social` + `orbit` metadata
//! - [`conflict_detector`]: stored vs incoming social handles
//! - [`planner`]: create / update / conflict buckets
//! - [`applier`]: every store write
//! - [`resolver`]: sequential conflict queue walk
//! - [`pipeline`]: runs the stages end to end

pub mod applier;
pub mod conflict_detector;
pub mod identity;
pub mod mapper;
pub mod pipeline;
pub mod planner;
pub mod resolver;
pub mod types;

pub use applier::{CommitApplier, UpdateSummary, DEFAULT_UPDATE_CONCURRENCY};
pub use conflict_detector::detect_conflicts;
pub use identity::{resolve_name, sanitize_name};
pub use mapper::map_attributes;
pub use pipeline::{ImportOptions, OrbitImportPipeline};
pub use planner::{PlanContext, Planner, PEOPLE_PREFIX, QUARANTINE_PREFIX};
pub use resolver::ConflictResolver;
pub use types::{
    ConflictEntry, ConflictOutcome, ImportReport, ImportStats, MappedMetadata, OrbitAttributes,
    PendingUpdate, Plan, Resolution,
};
