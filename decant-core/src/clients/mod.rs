//! Typed clients for the release-hosting APIs decant can install from
//!
//! Each client speaks one host's REST surface and nothing else: request
//! construction, auth headers, pagination, and status/decoding errors.
//! All of them produce the same [`Release`]/[`ReleaseAsset`] wire model so
//! the discovery algorithm in [`crate::resolve`] is written exactly once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::HttpCache;

mod forgejo;
mod github;
mod gitlab;
mod hashicorp;
mod homebrew;

pub use forgejo::ForgejoClient;
pub use github::GitHubClient;
pub use gitlab::GitLabClient;
pub use hashicorp::HashicorpClient;
pub use homebrew::{Bottle, Formula, HomebrewClient};

/// Page size used when walking a release listing. A page with fewer entries
/// than this terminates the walk.
pub const PAGE_SIZE: usize = 50;

/// A tagged, timestamped publication carrying downloadable assets.
///
/// The field names follow the Gitea/GitHub JSON shape; the GitLab and
/// Hashicorp clients map their own shapes into this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub id: i64,

    /// Raw tag name, may carry a `v` prefix
    pub tag_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub draft: bool,

    #[serde(default)]
    pub prerelease: bool,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable file attached to a release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    #[serde(default)]
    pub id: i64,

    pub name: String,

    #[serde(default)]
    pub size: i64,

    #[serde(default)]
    pub download_count: i64,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Host-side identifier, where the host has one (Gitea/Forgejo)
    #[serde(default)]
    pub uuid: Option<String>,

    pub browser_download_url: String,
}

/// Errors from one request against a hosting API.
///
/// The HTTP status is carried as data so callers classify recoverable
/// outcomes (a 404 on a `latest` endpoint) without matching error text.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response body from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// True when the host answered 404: the resource (or the endpoint) does
    /// not exist for this repository.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }
}

/// The uniform discovery surface: list, latest, by-tag.
///
/// Implemented by every host client whose API exposes a release history.
/// (Homebrew does not; its formula lookup lives on [`HomebrewClient`]
/// directly.)
#[async_trait]
pub trait ReleaseClient: Send + Sync {
    /// All releases, newest first in host order, walking pages of
    /// [`PAGE_SIZE`] until a short page.
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, ClientError>;

    /// The host's dedicated "latest release" lookup.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, ClientError>;

    /// A release by exact tag name.
    async fn release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, ClientError>;

    /// Whether an API token is configured on this client.
    fn has_token(&self) -> bool;
}

/// How a configured token is presented to the host
#[derive(Debug, Clone)]
pub(crate) enum AuthHeader {
    /// `Authorization: token {token}` (Gitea/Forgejo, GitHub)
    Token(String),

    /// `PRIVATE-TOKEN: {token}` (GitLab)
    PrivateToken(String),
}

/// Shared GET-and-decode plumbing behind every client.
///
/// Fully configured at construction: base client, optional auth, optional
/// disk cache. Read-only discovery calls pass through the cache; the cache
/// never sees non-200 responses.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    auth: Option<AuthHeader>,
    cache: Option<HttpCache>,
}

impl Transport {
    pub(crate) fn new(auth: Option<AuthHeader>, cache: Option<HttpCache>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()
            .expect("default reqwest client is constructible");

        Self { http, auth, cache }
    }

    pub(crate) fn has_token(&self) -> bool {
        self.auth.is_some()
    }

    /// GET `url` and decode the JSON body, consulting the cache first.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let body = self.get_text(url).await?;

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, ClientError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.lookup(url) {
                return Ok(body);
            }
        }

        tracing::trace!("GET {}", url);

        let mut request = self.http.get(url);
        match &self.auth {
            Some(AuthHeader::Token(token)) => {
                request = request.header("Authorization", format!("token {token}"));
            }
            Some(AuthHeader::PrivateToken(token)) => {
                request = request.header("PRIVATE-TOKEN", token.clone());
            }
            None => {}
        }

        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;

        if let Some(cache) = &self.cache {
            cache.store(url, &body);
        }

        Ok(body)
    }
}

/// Validate a caller-supplied base URL, trimming any trailing slash.
pub(crate) fn check_base_url(base: &str) -> Result<String, ClientError> {
    reqwest::Url::parse(base).map_err(|_| ClientError::InvalidBaseUrl(base.to_string()))?;
    Ok(base.trim_end_matches('/').to_string())
}
