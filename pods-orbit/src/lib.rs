//! pods-orbit: Orbit member import for the pods note graph
//!
//! Fetches workspace members from the Orbit API and reconciles them with
//! `people.*` notes: new members become notes, unchanged notes are left
//! alone, and conflicting social handles are resolved one at a time.

pub mod config;
pub mod decision;
pub mod error;
pub mod import;
pub mod models;
pub mod services;

pub use error::{ErrorSeverity, ImportError, ImportResult};
