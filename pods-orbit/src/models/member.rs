//! Orbit member records as returned by the members API
//!
//! The API speaks JSON:API: members arrive as `{ id, type, attributes }`
//! inside a `data` envelope, listings carry `links.next`.

use pods_common::notes::SocialHandles;
use serde::{Deserialize, Deserializer, Serialize};

/// One member of an Orbit workspace
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OrbitMember {
    /// Stable Orbit member id
    pub id: String,
    #[serde(default)]
    pub attributes: MemberAttributes,
}

/// Member attributes used by the import
///
/// Unknown attributes in the payload are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MemberAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub orbit_url: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
}

/// `"tags": null` reads as no tags
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Blank strings count as unset
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl OrbitMember {
    /// Social handles carried by this member, blanks normalized to `None`
    pub fn social(&self) -> SocialHandles {
        let a = &self.attributes;
        SocialHandles {
            github: non_blank(&a.github),
            discord: non_blank(&a.discord),
            linkedin: non_blank(&a.linkedin),
            twitter: non_blank(&a.twitter),
            email: non_blank(&a.email),
            ..Default::default()
        }
    }

    /// Display name, if the member has a non-blank one
    pub fn display_name(&self) -> Option<String> {
        non_blank(&self.attributes.name)
    }
}

/// `links` object of a listing response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// Listing response: `{ "data": [...], "links": { "next": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct MemberPageEnvelope {
    #[serde(default)]
    pub data: Vec<OrbitMember>,
    #[serde(default)]
    pub links: PageLinks,
}

/// Single-member response: `{ "data": {...} }`
#[derive(Debug, Clone, Deserialize)]
pub struct MemberEnvelope {
    pub data: OrbitMember,
}

/// One page of members plus the cursor for the next page (`None` at the end)
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<OrbitMember>,
    pub next: Option<String>,
}

impl From<MemberPageEnvelope> for MemberPage {
    fn from(envelope: MemberPageEnvelope) -> Self {
        Self {
            members: envelope.data,
            // Some deployments send an empty string instead of null on the last page
            next: envelope.links.next.filter(|n| !n.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_listing_envelope() {
        let raw = json!({
            "data": [{
                "id": "m1",
                "type": "member",
                "attributes": {
                    "name": null,
                    "github": "alice",
                    "email": "alice@x.com",
                    "orbit_level": 2,
                    "tags": ["speaker"]
                }
            }],
            "links": { "first": "x", "next": "https://example.test/members?page=2" }
        });

        let page: MemberPage = serde_json::from_value::<MemberPageEnvelope>(raw)
            .unwrap()
            .into();
        assert_eq!(page.members.len(), 1);
        assert_eq!(page.members[0].attributes.github.as_deref(), Some("alice"));
        assert_eq!(page.members[0].attributes.tags, vec!["speaker"]);
        assert_eq!(page.next.as_deref(), Some("https://example.test/members?page=2"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let raw = json!({ "data": [], "links": { "next": null } });
        let page: MemberPage = serde_json::from_value::<MemberPageEnvelope>(raw)
            .unwrap()
            .into();
        assert!(page.next.is_none());

        let raw = json!({ "data": [], "links": { "next": "" } });
        let page: MemberPage = serde_json::from_value::<MemberPageEnvelope>(raw)
            .unwrap()
            .into();
        assert!(page.next.is_none());
    }

    #[test]
    fn test_null_tags_read_as_empty() {
        let raw = json!({
            "data": [
                { "id": "m1", "attributes": { "github": "alice", "tags": null } },
                { "id": "m2", "attributes": { "github": "bob" } }
            ],
            "links": { "next": null }
        });

        let page: MemberPage = serde_json::from_value::<MemberPageEnvelope>(raw)
            .unwrap()
            .into();
        assert_eq!(page.members.len(), 2);
        assert!(page.members[0].attributes.tags.is_empty());
        assert!(page.members[1].attributes.tags.is_empty());
    }

    #[test]
    fn test_social_normalizes_blanks() {
        let member = OrbitMember {
            id: "m2".to_string(),
            attributes: MemberAttributes {
                github: Some("  ".to_string()),
                twitter: Some("@carol".to_string()),
                ..Default::default()
            },
        };

        let social = member.social();
        assert_eq!(social.github, None);
        assert_eq!(social.twitter.as_deref(), Some("@carol"));
    }
}
