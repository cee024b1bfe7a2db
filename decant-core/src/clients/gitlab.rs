//! GitLab release client
//!
//! GitLab's v4 API differs from the Gitea family in every particular that
//! matters here: projects are addressed by a URL-encoded `owner/repo` path
//! (owners may be nested groups), auth rides in a `PRIVATE-TOKEN` header,
//! the latest release lives under `releases/permalink/latest`, and assets
//! are link objects. Responses are mapped into the common wire model at
//! the edge so nothing downstream knows the difference.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{check_base_url, AuthHeader, ClientError, Release, ReleaseAsset, ReleaseClient, Transport, PAGE_SIZE};
use crate::cache::HttpCache;

pub const GITLAB_BASE_URL: &str = "https://gitlab.com/api/v4";

#[derive(Debug, Deserialize)]
struct GitLabRelease {
    #[serde(default)]
    name: String,

    tag_name: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    upcoming_release: bool,

    #[serde(default)]
    released_at: Option<DateTime<Utc>>,

    #[serde(default)]
    assets: GitLabAssets,
}

#[derive(Debug, Default, Deserialize)]
struct GitLabAssets {
    #[serde(default)]
    links: Vec<GitLabLink>,
}

#[derive(Debug, Deserialize)]
struct GitLabLink {
    #[serde(default)]
    id: i64,

    name: String,

    url: String,

    #[serde(default)]
    direct_asset_url: Option<String>,
}

impl From<GitLabRelease> for Release {
    fn from(r: GitLabRelease) -> Self {
        Release {
            id: 0,
            tag_name: r.tag_name,
            name: r.name,
            body: r.description,
            draft: false,
            prerelease: r.upcoming_release,
            created_at: r.released_at,
            published_at: r.released_at,
            assets: r
                .assets
                .links
                .into_iter()
                .map(|link| ReleaseAsset {
                    id: link.id,
                    name: link.name,
                    size: 0,
                    download_count: 0,
                    created_at: None,
                    uuid: None,
                    browser_download_url: link.direct_asset_url.unwrap_or(link.url),
                })
                .collect(),
        }
    }
}

pub struct GitLabClient {
    transport: Transport,
    base_url: String,
}

impl GitLabClient {
    pub fn new(token: Option<String>, cache: Option<HttpCache>) -> Self {
        Self {
            transport: Transport::new(token.map(AuthHeader::PrivateToken), cache),
            base_url: GITLAB_BASE_URL.to_string(),
        }
    }

    /// Point the client at a self-hosted instance's API root,
    /// e.g. `https://gitlab.example.com/api/v4`.
    pub fn with_base_url(
        base_url: &str,
        token: Option<String>,
        cache: Option<HttpCache>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(token.map(AuthHeader::PrivateToken), cache),
            base_url: check_base_url(base_url)?,
        })
    }

    /// Project path segment: `owner/repo` with every slash percent-encoded.
    fn project(owner: &str, repo: &str) -> String {
        format!("{owner}/{repo}").replace('/', "%2F")
    }
}

#[async_trait]
impl ReleaseClient for GitLabClient {
    async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>, ClientError> {
        let project = Self::project(owner, repo);
        let mut all = Vec::new();

        for page in 1.. {
            let url = format!(
                "{}/projects/{}/releases?per_page={}&page={}",
                self.base_url, project, PAGE_SIZE, page
            );

            let releases: Vec<GitLabRelease> = self.transport.get_json(&url).await?;
            let short_page = releases.len() < PAGE_SIZE;
            all.extend(releases.into_iter().map(Release::from));

            if short_page {
                break;
            }
        }

        Ok(all)
    }

    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Release, ClientError> {
        let url = format!(
            "{}/projects/{}/releases/permalink/latest",
            self.base_url,
            Self::project(owner, repo)
        );

        let release: GitLabRelease = self.transport.get_json(&url).await?;
        Ok(release.into())
    }

    async fn release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, ClientError> {
        let url = format!(
            "{}/projects/{}/releases/{}",
            self.base_url,
            Self::project(owner, repo),
            tag
        );

        let release: GitLabRelease = self.transport.get_json(&url).await?;
        Ok(release.into())
    }

    fn has_token(&self) -> bool {
        self.transport.has_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_encodes_nested_groups() {
        assert_eq!(
            GitLabClient::project("group/subgroup", "project"),
            "group%2Fsubgroup%2Fproject"
        );
    }

    #[test]
    fn test_release_mapping_prefers_direct_asset_url() {
        let body = r#"{
            "name": "Release 1.0",
            "tag_name": "v1.0.0",
            "description": "notes",
            "upcoming_release": false,
            "released_at": "2024-01-01T00:00:00Z",
            "assets": {
                "links": [
                    {"id": 5, "name": "tool-linux-amd64", "url": "https://gitlab.com/x",
                     "direct_asset_url": "https://gitlab.com/x/direct"}
                ]
            }
        }"#;

        let release: Release = serde_json::from_str::<GitLabRelease>(body).unwrap().into();
        assert_eq!(release.tag_name, "v1.0.0");
        assert_eq!(
            release.assets[0].browser_download_url,
            "https://gitlab.com/x/direct"
        );
    }
}
