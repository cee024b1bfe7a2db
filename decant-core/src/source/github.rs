//! GitHub source descriptor

use anyhow::{bail, Result};

use super::{descriptor_cache, downloads_dir, fetch_assets, GITHUB, VERSION_UNKNOWN};
use crate::clients::{GitHubClient, Release};
use crate::config::Options;
use crate::resolve::{self, strip_v};

#[derive(Debug)]
pub struct GitHubSource {
    pub opts: Options,
    pub owner: String,
    pub repo: String,
    pub version: String,
    pub release: Option<Release>,
}

impl GitHubSource {
    pub fn new(opts: Options, owner: String, repo: String, version: String) -> Self {
        Self {
            opts,
            owner,
            repo,
            version,
            release: None,
        }
    }

    pub fn source(&self) -> String {
        GITHUB.to_string()
    }

    pub fn app(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.source(), self.app())
    }

    pub fn version(&self) -> String {
        match &self.release {
            Some(release) => strip_v(&release.tag_name).to_string(),
            None => VERSION_UNKNOWN.to_string(),
        }
    }

    fn token(&self) -> Option<String> {
        self.opts.config.github_token.clone()
    }

    fn client(&self) -> Result<GitHubClient> {
        let cache = descriptor_cache(&self.opts, &self.id())?;
        Ok(GitHubClient::new(self.token(), Some(cache)))
    }

    /// Resolve the requested version and store the release, without
    /// requiring assets. The meta-sources built on GitHub (Kubernetes,
    /// Helm) discover versions here but synthesize their own assets.
    pub(super) async fn discover(&mut self) -> Result<()> {
        let client = self.client()?;

        let discovery = resolve::find_release(
            &client,
            &self.owner,
            &self.repo,
            &self.version,
            self.opts.include_prereleases,
        )
        .await?;

        self.version = discovery.version;
        self.release = Some(discovery.release);

        Ok(())
    }

    pub async fn pre_run(&mut self) -> Result<()> {
        self.discover().await?;

        let no_assets = self.release.as_ref().map_or(true, |r| r.assets.is_empty());
        if no_assets {
            bail!(
                "release found, but no assets found for {} version {}",
                self.app(),
                self.version
            );
        }

        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let release = self
            .release
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no release resolved for {}", self.app()))?;

        let dest = downloads_dir(&self.opts, &self.id(), &self.version)?;
        fetch_assets(
            &release.assets,
            &self.repo,
            &self.opts,
            &dest,
            self.token().as_deref(),
        )
        .await
    }
}
