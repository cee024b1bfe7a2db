//! GitHub release client
//!
//! Same three endpoint shapes as the Gitea family, with GitHub's `per_page`
//! pagination parameter and the api.github.com default endpoint.

use async_trait::async_trait;

use super::{check_base_url, AuthHeader, ClientError, Release, ReleaseClient, Transport, PAGE_SIZE};
use crate::cache::HttpCache;

pub const GITHUB_BASE_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    transport: Transport,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>, cache: Option<HttpCache>) -> Self {
        Self {
            transport: Transport::new(token.map(AuthHeader::Token), cache),
            base_url: GITHUB_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root, mainly for tests.
    pub fn with_base_url(
        base_url: &str,
        token: Option<String>,
        cache: Option<HttpCache>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(token.map(AuthHeader::Token), cache),
            base_url: check_base_url(base_url)?,
        })
    }
}

#[async_trait]
impl ReleaseClient for GitHubClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, ClientError> {
        let mut all = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/repos/{}/{}/releases?per_page={}&page={}",
                self.base_url, owner, repo, PAGE_SIZE, page
            );

            let releases: Vec<Release> = self.transport.get_json(&url).await?;
            let short_page = releases.len() < PAGE_SIZE;
            all.extend(releases);

            if short_page {
                break;
            }
        }

        Ok(all)
    }

    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, ClientError> {
        let url = format!("{}/repos/{}/{}/releases/latest", self.base_url, owner, repo);
        self.transport.get_json(&url).await
    }

    async fn release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, ClientError> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.base_url, owner, repo, tag
        );
        self.transport.get_json(&url).await
    }

    fn has_token(&self) -> bool {
        self.transport.has_token()
    }
}
