//! Conflict detection between a stored node and an incoming record
//!
//! A field conflicts only when the stored value is set AND differs from the
//! incoming value. Unset stored fields are adopted silently by the update
//! path, never reported here. An incoming unset value against a stored one
//! is a difference. The comparison is type-sensitive: a stored non-string
//! value (`"github": 42`) never equals an incoming handle.

use pods_common::notes::{NoteCustom, SocialHandles, SocialKey, SOCIAL_KEYS};

/// Disagreeing social keys, in [`SOCIAL_KEYS`] order
///
/// Empty when the stored node has no social section at all.
pub fn detect_conflicts(existing: &NoteCustom, incoming: &SocialHandles) -> Vec<SocialKey> {
    let Some(stored) = existing.social.as_ref() else {
        return Vec::new();
    };

    let conflicts: Vec<SocialKey> = SOCIAL_KEYS
        .iter()
        .copied()
        .filter(|key| match stored.get(*key) {
            Some(current) => incoming.get(*key) != Some(current),
            None => stored.raw_value(*key).is_some(),
        })
        .collect();

    if !conflicts.is_empty() {
        tracing::debug!(?conflicts, "Detected field conflicts");
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn custom(social: Option<SocialHandles>) -> NoteCustom {
        NoteCustom {
            social,
            ..Default::default()
        }
    }

    fn handles(github: Option<&str>, twitter: Option<&str>, email: Option<&str>) -> SocialHandles {
        SocialHandles {
            github: github.map(str::to_string),
            twitter: twitter.map(str::to_string),
            email: email.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_social_section_means_no_conflict() {
        let incoming = handles(Some("new"), None, None);
        assert!(detect_conflicts(&custom(None), &incoming).is_empty());
    }

    #[test]
    fn test_unset_stored_field_is_adopted_not_conflicting() {
        let stored = custom(Some(handles(None, None, None)));
        let incoming = handles(Some("alice"), Some("@alice"), Some("a@x.com"));
        assert!(detect_conflicts(&stored, &incoming).is_empty());
    }

    #[test]
    fn test_equal_values_do_not_conflict() {
        let stored = custom(Some(handles(Some("bob"), None, None)));
        let incoming = handles(Some("bob"), Some("@bob"), None);
        assert!(detect_conflicts(&stored, &incoming).is_empty());
    }

    #[test]
    fn test_set_and_different_conflicts() {
        let stored = custom(Some(handles(Some("bob-old"), None, None)));
        let incoming = handles(Some("bob-new"), None, None);
        assert_eq!(detect_conflicts(&stored, &incoming), vec![SocialKey::Github]);
    }

    #[test]
    fn test_incoming_unset_against_stored_value_conflicts() {
        let stored = custom(Some(handles(None, Some("@bob"), None)));
        let incoming = handles(None, None, None);
        assert_eq!(detect_conflicts(&stored, &incoming), vec![SocialKey::Twitter]);
    }

    #[test]
    fn test_order_follows_canonical_key_order() {
        let stored = custom(Some(handles(Some("g"), Some("t"), Some("e"))));
        let incoming = handles(Some("g2"), Some("t2"), Some("e2"));
        assert_eq!(
            detect_conflicts(&stored, &incoming),
            vec![SocialKey::Github, SocialKey::Twitter, SocialKey::Email]
        );
    }

    #[test]
    fn test_non_string_stored_value_conflicts() {
        let stored: NoteCustom =
            serde_json::from_value(json!({ "social": { "github": 42 } })).unwrap();

        let incoming = handles(Some("42"), None, None);
        assert_eq!(detect_conflicts(&stored, &incoming), vec![SocialKey::Github]);
        let incoming = handles(None, None, None);
        assert_eq!(detect_conflicts(&stored, &incoming), vec![SocialKey::Github]);
    }

    #[test]
    fn test_unknown_social_keys_are_ignored() {
        let stored: NoteCustom = serde_json::from_value(
            json!({ "social": { "github": "bob", "mastodon": "@bob@x" } }),
        )
        .unwrap();
        let incoming = handles(Some("bob"), None, None);
        assert!(detect_conflicts(&stored, &incoming).is_empty());
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let stored = custom(Some(handles(Some("Bob"), None, None)));
        let incoming = handles(Some("bob"), None, None);
        assert_eq!(detect_conflicts(&stored, &incoming), vec![SocialKey::Github]);
    }
}
