//! Member fixtures

use chrono::{DateTime, TimeZone, Utc};
use pods_orbit::models::{MemberAttributes, OrbitMember};
use serde_json::{json, Value};

/// 2024-03-09 12:00 UTC; quarantine names use `2024.03.09`
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()
}

pub fn member(id: &str) -> MemberBuilder {
    MemberBuilder {
        member: OrbitMember {
            id: id.to_string(),
            attributes: MemberAttributes::default(),
        },
    }
}

pub struct MemberBuilder {
    member: OrbitMember,
}

impl MemberBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.member.attributes.name = Some(name.to_string());
        self
    }

    pub fn github(mut self, github: &str) -> Self {
        self.member.attributes.github = Some(github.to_string());
        self
    }

    pub fn twitter(mut self, twitter: &str) -> Self {
        self.member.attributes.twitter = Some(twitter.to_string());
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.member.attributes.email = Some(email.to_string());
        self
    }

    pub fn company(mut self, company: &str) -> Self {
        self.member.attributes.company = Some(company.to_string());
        self
    }

    pub fn build(self) -> OrbitMember {
        self.member
    }

    /// JSON:API resource as the members endpoint returns it
    pub fn json(self) -> Value {
        json!({
            "id": self.member.id,
            "type": "member",
            "attributes": self.member.attributes,
        })
    }
}
