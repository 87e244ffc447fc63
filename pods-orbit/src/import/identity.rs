//! Identity resolution: record → document name component
//!
//! Candidates, in priority order: display name, github, discord, twitter,
//! email local-part, member id. The first candidate that is non-empty after
//! sanitization wins, so the result never depends on which later fields
//! happen to be set.

use crate::models::OrbitMember;

/// Derive the canonical name component for a member
pub fn resolve_name(member: &OrbitMember) -> String {
    let social = member.social();

    let candidates = [
        member.display_name(),
        social.github,
        social.discord,
        social.twitter,
        social.email.as_deref().and_then(email_local_part),
    ];

    candidates
        .iter()
        .flatten()
        .map(|c| sanitize_name(c))
        .find(|c| !c.is_empty())
        .unwrap_or_else(|| sanitize_name(&member.id))
}

/// Username part of an email address (`alice@x.com` → `alice`)
fn email_local_part(email: &str) -> Option<String> {
    let local = email.split('@').next().unwrap_or_default().trim();
    if local.is_empty() {
        None
    } else {
        Some(local.to_string())
    }
}

/// Make a string safe as a single name component
///
/// Lowercases, keeps letters and digits of any script plus `_`, turns
/// everything else into `-` (dots included, since a dot would start a new
/// hierarchy level), collapses runs of `-` and trims them from both ends.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_dash = false;

    for ch in raw.trim().chars().flat_map(char::to_lowercase) {
        let keep = ch.is_alphanumeric() || ch == '_';
        if keep {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}
