//! GitLab source descriptor
//!
//! Owners may be nested groups (`group/subgroup`), which is why the parser
//! joins all-but-the-last identifier segments into `owner`.

use anyhow::{bail, Result};

use super::{descriptor_cache, downloads_dir, fetch_assets, GITLAB, VERSION_UNKNOWN};
use crate::clients::{GitLabClient, Release};
use crate::config::Options;
use crate::resolve::{self, strip_v};

#[derive(Debug)]
pub struct GitLabSource {
    pub opts: Options,

    /// Custom endpoint for self-hosted instances
    pub base_url: Option<String>,

    /// The configured provider name, when reached through one
    pub source_name: Option<String>,

    pub owner: String,
    pub repo: String,
    pub version: String,
    pub release: Option<Release>,
}

impl GitLabSource {
    pub fn new(
        opts: Options,
        base_url: Option<String>,
        source_name: Option<String>,
        owner: String,
        repo: String,
        version: String,
    ) -> Self {
        Self {
            opts,
            base_url,
            source_name,
            owner,
            repo,
            version,
            release: None,
        }
    }

    pub fn source(&self) -> String {
        match &self.source_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => GITLAB.to_string(),
        }
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
        self.opts.config.gitlab_token.clone()
    }

    fn client(&self) -> Result<GitLabClient> {
        let cache = descriptor_cache(&self.opts, &self.id())?;

        match &self.base_url {
            Some(base) => Ok(GitLabClient::with_base_url(
                base,
                self.token(),
                Some(cache),
            )?),
            None => Ok(GitLabClient::new(self.token(), Some(cache))),
        }
    }

    pub async fn pre_run(&mut self) -> Result<()> {
        let client = self.client()?;

        let discovery = resolve::find_release(
            &client,
            &self.owner,
            &self.repo,
            &self.version,
            self.opts.include_prereleases,
        )
        .await?;

        if discovery.release.assets.is_empty() {
            bail!(
                "release found, but no assets found for {} version {}",
                self.app(),
                discovery.version
            );
        }

        self.version = discovery.version;
        self.release = Some(discovery.release);

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
