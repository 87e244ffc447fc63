//! Data models for the Orbit import

pub mod member;
pub mod resolution;

pub use member::{MemberAttributes, MemberEnvelope, MemberPage, MemberPageEnvelope, OrbitMember};
pub use resolution::ResolutionPolicy;
