//! Hashicorp release client
//!
//! releases.hashicorp.com has its own v1 API: releases are listed per
//! product, newest first, paginated by an `after` timestamp rather than a
//! page number, and each release carries per-platform build objects
//! instead of named assets. Builds are mapped into the common wire model;
//! the synthesized asset name is the URL basename (e.g.
//! `terraform_1.9.0_linux_amd64.zip`), which carries the os/arch tokens
//! selection needs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ClientError, Release, ReleaseAsset, ReleaseClient, Transport};
use crate::cache::HttpCache;

pub const HASHICORP_BASE_URL: &str = "https://api.releases.hashicorp.com";

/// The v1 API caps `limit` at 20.
const LIST_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
struct HashicorpRelease {
    version: String,

    #[serde(default)]
    is_prerelease: bool,

    #[serde(default)]
    timestamp_created: Option<DateTime<Utc>>,

    #[serde(default)]
    builds: Vec<HashicorpBuild>,
}

#[derive(Debug, Deserialize)]
struct HashicorpBuild {
    url: String,
}

impl From<HashicorpRelease> for Release {
    fn from(r: HashicorpRelease) -> Self {
        Release {
            id: 0,
            tag_name: r.version,
            name: String::new(),
            body: String::new(),
            draft: false,
            prerelease: r.is_prerelease,
            created_at: r.timestamp_created,
            published_at: r.timestamp_created,
            assets: r
                .builds
                .into_iter()
                .map(|build| {
                    let name = build
                        .url
                        .rsplit('/')
                        .next()
                        .unwrap_or(&build.url)
                        .to_string();
                    ReleaseAsset {
                        id: 0,
                        name,
                        size: 0,
                        download_count: 0,
                        created_at: None,
                        uuid: None,
                        browser_download_url: build.url,
                    }
                })
                .collect(),
        }
    }
}

pub struct HashicorpClient {
    transport: Transport,
    base_url: String,
}

impl HashicorpClient {
    pub fn new(cache: Option<HttpCache>) -> Self {
        Self {
            transport: Transport::new(None, cache),
            base_url: HASHICORP_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root, mainly for tests.
    pub fn with_base_url(base_url: &str, cache: Option<HttpCache>) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(None, cache),
            base_url: super::check_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl ReleaseClient for HashicorpClient {
    async fn list_releases(&self, _owner: &str, repo: &str) -> Result<Vec<Release>, ClientError> {
        let mut all: Vec<Release> = Vec::new();
        let mut after: Option<DateTime<Utc>> = None;

        loop {
            let mut url = format!(
                "{}/v1/releases/{}?limit={}",
                self.base_url, repo, LIST_LIMIT
            );
            if let Some(ts) = after {
                url.push_str(&format!("&after={}", ts.to_rfc3339()));
            }

            let releases: Vec<HashicorpRelease> = self.transport.get_json(&url).await?;
            let short_page = releases.len() < LIST_LIMIT;
            after = releases.last().and_then(|r| r.timestamp_created);

            all.extend(releases.into_iter().map(Release::from));

            // A page without timestamps cannot advance the cursor.
            if short_page || after.is_none() {
                break;
            }
        }

        Ok(all)
    }

    async fn latest_release(&self, _owner: &str, repo: &str) -> Result<Release, ClientError> {
        // No dedicated latest endpoint; the newest entry of a one-item page
        // serves the same purpose, with an empty product answering 404-like.
        let url = format!("{}/v1/releases/{}?limit=1", self.base_url, repo);
        let releases: Vec<HashicorpRelease> = self.transport.get_json(&url).await?;

        match releases.into_iter().next() {
            Some(release) => Ok(release.into()),
            None => Err(ClientError::Status { status: 404, url }),
        }
    }

    async fn release_by_tag(
        &self,
        _owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, ClientError> {
        let url = format!("{}/v1/releases/{}/{}", self.base_url, repo, tag);
        let release: HashicorpRelease = self.transport.get_json(&url).await?;
        Ok(release.into())
    }

    fn has_token(&self) -> bool {
        false
    }
}
