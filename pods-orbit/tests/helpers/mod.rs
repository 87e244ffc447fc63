//! Test helpers for pods-orbit integration tests
//!
//! - MockOrbit: in-process Orbit members API on 127.0.0.1:0
//! - builders: member fixtures and a fixed clock

#![allow(dead_code)]

pub mod builders;
pub mod mock_orbit;

pub use builders::{fixed_now, member, MemberBuilder};
pub use mock_orbit::{MockOrbit, RecordedRequest};
