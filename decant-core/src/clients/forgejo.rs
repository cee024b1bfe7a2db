//! Forgejo/Gitea release client
//!
//! Speaks the Gitea-compatible API (`/repos/{owner}/{repo}/releases`),
//! which is what Codeberg and self-hosted Forgejo/Gitea instances expose.
//! There is no default endpoint: a base URL always comes from the caller,
//! either the fixed Codeberg one or a configured custom provider.

use async_trait::async_trait;

use super::{check_base_url, AuthHeader, ClientError, Release, ReleaseClient, Transport, PAGE_SIZE};
use crate::cache::HttpCache;

pub struct ForgejoClient {
    transport: Transport,
    base_url: String,
}

impl ForgejoClient {
    /// Build a fully-configured client. `base_url` points at the API root,
    /// e.g. `https://codeberg.org/api/v1`.
    pub fn new(
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
impl ReleaseClient for ForgejoClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, ClientError> {
        let mut all = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/repos/{}/{}/releases?limit={}&page={}",
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
