//! Document graph node model
//!
//! Nodes are addressed by a dot-hierarchical name (`fname`) that is unique
//! within a vault. Hierarchy is implied by the name: `people.alice` is a
//! child of `people`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Social identity handles attached to a node
///
/// The five known handles are typed; an unset handle is `None` (serialized
/// as `null`). Stored data is read leniently: keys outside the known set,
/// and known keys holding something other than a string, are kept verbatim
/// in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SocialHandles {
    pub github: Option<String>,
    pub discord: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub email: Option<String>,
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for SocialHandles {
    fn from(mut raw: Map<String, Value>) -> Self {
        let mut social = SocialHandles::default();
        for key in SOCIAL_KEYS {
            match raw.remove(key.as_str()) {
                Some(Value::String(handle)) => social.set(key, Some(handle)),
                Some(Value::Null) | None => {}
                Some(other) => {
                    raw.insert(key.as_str().to_string(), other);
                }
            }
        }
        social.extra = raw;
        social
    }
}

impl From<SocialHandles> for Map<String, Value> {
    fn from(social: SocialHandles) -> Self {
        let mut map = social.extra.clone();
        for key in SOCIAL_KEYS {
            match social.get(key) {
                Some(handle) => {
                    map.insert(key.as_str().to_string(), Value::String(handle.to_string()));
                }
                None => {
                    map.entry(key.as_str()).or_insert(Value::Null);
                }
            }
        }
        map
    }
}

/// One key of [`SocialHandles`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialKey {
    Github,
    Discord,
    Linkedin,
    Twitter,
    Email,
}

/// Canonical ordering of social keys
///
/// Conflict reports list keys in this order regardless of how the incoming
/// data was laid out.
pub const SOCIAL_KEYS: [SocialKey; 5] = [
    SocialKey::Github,
    SocialKey::Discord,
    SocialKey::Linkedin,
    SocialKey::Twitter,
    SocialKey::Email,
];

impl SocialKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Discord => "discord",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for SocialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SocialHandles {
    pub fn get(&self, key: SocialKey) -> Option<&str> {
        match key {
            SocialKey::Github => self.github.as_deref(),
            SocialKey::Discord => self.discord.as_deref(),
            SocialKey::Linkedin => self.linkedin.as_deref(),
            SocialKey::Twitter => self.twitter.as_deref(),
            SocialKey::Email => self.email.as_deref(),
        }
    }

    /// Stored value of a known key that is not a string (`42`, `true`, ...)
    pub fn raw_value(&self, key: SocialKey) -> Option<&Value> {
        self.extra.get(key.as_str()).filter(|v| !v.is_null())
    }

    /// A typed handle or a non-string stored value is present
    pub fn is_set(&self, key: SocialKey) -> bool {
        self.get(key).is_some() || self.raw_value(key).is_some()
    }

    /// Set a typed handle, replacing any non-string value stored under `key`
    pub fn set(&mut self, key: SocialKey, value: Option<String>) {
        self.extra.remove(key.as_str());
        let slot = match key {
            SocialKey::Github => &mut self.github,
            SocialKey::Discord => &mut self.discord,
            SocialKey::Linkedin => &mut self.linkedin,
            SocialKey::Twitter => &mut self.twitter,
            SocialKey::Email => &mut self.email,
        };
        *slot = value;
    }

    /// True when none of the known handles is set
    pub fn is_empty(&self) -> bool {
        SOCIAL_KEYS.iter().all(|k| !self.is_set(*k))
    }

    /// Take every known handle from `incoming`; other keys stay as they are
    pub fn overlay(&mut self, incoming: &SocialHandles) {
        for key in SOCIAL_KEYS {
            self.set(key, incoming.get(key).map(str::to_string));
        }
    }
}

/// Custom metadata section of a node
///
/// `social` is typed; everything else (including pod-specific bags such as
/// `orbit`) is kept as raw JSON so foreign metadata survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteCustom {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialHandles>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NoteCustom {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }
}

/// A node in the document graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: Uuid,
    /// Dot-hierarchical name, unique within the vault
    pub fname: String,
    /// Owning vault
    pub vault: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub custom: NoteCustom,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl DocumentNode {
    /// Create an empty node with a fresh id
    pub fn new(fname: impl Into<String>, vault: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fname: fname.into(),
            vault: vault.into(),
            title: title.into(),
            body: String::new(),
            custom: NoteCustom::default(),
            created: now,
            updated: now,
        }
    }
}
