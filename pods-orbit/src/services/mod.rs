//! Remote services used by the import

pub mod orbit_client;

pub use orbit_client::{MemberSource, OrbitClient, OrbitClientConfig, DEFAULT_API_BASE};
