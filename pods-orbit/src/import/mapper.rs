//! Record mapper: member attributes → node custom metadata
//!
//! Only an allow-list is kept: the social handles go to `custom.social`,
//! a handful of profile fields plus the import timestamp go to
//! `custom.orbit`. Everything else on the record is dropped.

use super::types::{MappedMetadata, OrbitAttributes};
use crate::models::OrbitMember;
use chrono::{DateTime, Utc};

/// Project a member into node metadata, stamping `last_imported_at = now`
pub fn map_attributes(member: &OrbitMember, now: DateTime<Utc>) -> MappedMetadata {
    let a = &member.attributes;

    MappedMetadata {
        social: member.social(),
        orbit: OrbitAttributes {
            id: member.id.clone(),
            url: a.orbit_url.clone(),
            slug: a.slug.clone(),
            company: a.company.clone(),
            title: a.title.clone(),
            location: a.location.clone(),
            tags: a.tags.clone(),
            last_imported_at: now,
        },
    }
}
