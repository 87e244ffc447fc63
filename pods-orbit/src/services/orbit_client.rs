//! Orbit members API client
//!
//! Listing is cursor-paginated: each response names the next page in
//! `links.next`, so pages are fetched strictly one after another.

use crate::error::{ImportError, ImportResult};
use crate::models::{MemberEnvelope, MemberPage, MemberPageEnvelope, OrbitMember};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://app.orbit.love/api/v1";
const USER_AGENT: &str = concat!("pods-orbit/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of member records
///
/// Implemented by [`OrbitClient`]; the pipeline only depends on this trait.
#[async_trait]
pub trait MemberSource: Send + Sync {
    /// Fetch one page. `None` requests the first page; otherwise pass the
    /// `next` cursor returned by the previous page.
    async fn fetch_page(&self, cursor: Option<&str>) -> ImportResult<MemberPage>;

    /// Fetch a single member by id
    async fn fetch_single(&self, id: &str) -> ImportResult<OrbitMember>;

    /// Fetch every member, following `next` until the last page
    ///
    /// Members are returned in arrival order. The first failing page aborts
    /// the whole listing.
    async fn fetch_all(&self) -> ImportResult<Vec<OrbitMember>> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            pages += 1;
            members.extend(page.members);

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(pages, members = members.len(), "Fetched all members");
        Ok(members)
    }
}

/// Connection settings for [`OrbitClient`]
#[derive(Debug, Clone)]
pub struct OrbitClientConfig {
    /// API root, e.g. `https://app.orbit.love/api/v1`
    pub api_base: String,
    /// Workspace slug
    pub workspace: String,
    /// Bearer token
    pub token: String,
    pub timeout: Duration,
}

impl OrbitClientConfig {
    pub fn new(workspace: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            workspace: workspace.into(),
            token: token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn members_url(&self) -> String {
        format!(
            "{}/{}/members",
            self.api_base.trim_end_matches('/'),
            self.workspace
        )
    }
}

/// Orbit API client
pub struct OrbitClient {
    http_client: reqwest::Client,
    config: OrbitClientConfig,
}

impl OrbitClient {
    pub fn new(config: OrbitClientConfig) -> ImportResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImportError::fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// GET `url` with the bearer token and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> ImportResult<T> {
        tracing::debug!(url = %url, "Querying Orbit API");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ImportError::fetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImportError::fetch(format!(
                "HTTP {} from {}: {}",
                status.as_u16(),
                url,
                error_text.trim()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ImportError::fetch(format!("invalid response from {}: {}", url, e)))
    }
}

#[async_trait]
impl MemberSource for OrbitClient {
    async fn fetch_page(&self, cursor: Option<&str>) -> ImportResult<MemberPage> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => self.config.members_url(),
        };

        let envelope: MemberPageEnvelope = self.get_json(&url).await?;
        let page = MemberPage::from(envelope);

        tracing::debug!(
            members = page.members.len(),
            has_next = page.next.is_some(),
            "Fetched member page"
        );
        Ok(page)
    }

    async fn fetch_single(&self, id: &str) -> ImportResult<OrbitMember> {
        let url = format!("{}/{}", self.config.members_url(), id);
        let envelope: MemberEnvelope = self.get_json(&url).await?;

        tracing::info!(member_id = %envelope.data.id, "Fetched single member");
        Ok(envelope.data)
    }
}
