//! Hashicorp source descriptor
//!
//! Products live on releases.hashicorp.com under a single namespace, so
//! owner and repo are usually both derived from the product name
//! (`hashicorp/terraform`). Discovery runs through the shared resolver
//! against the Hashicorp client's mapped listing.

use anyhow::{bail, Result};

use super::{descriptor_cache, downloads_dir, fetch_assets, HASHICORP, VERSION_UNKNOWN};
use crate::clients::{HashicorpClient, Release};
use crate::config::Options;
use crate::resolve::{self, strip_v};

#[derive(Debug)]
pub struct HashicorpSource {
    pub opts: Options,
    pub owner: String,
    pub repo: String,
    pub version: String,
    pub release: Option<Release>,
}

impl HashicorpSource {
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
        HASHICORP.to_string()
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

    fn client(&self) -> Result<HashicorpClient> {
        let cache = descriptor_cache(&self.opts, &self.id())?;
        Ok(HashicorpClient::new(Some(cache)))
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
        fetch_assets(&release.assets, &self.repo, &self.opts, &dest, None).await
    }
}
