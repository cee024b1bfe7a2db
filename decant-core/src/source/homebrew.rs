//! Homebrew source descriptor
//!
//! formulae.brew.sh serves only the current stable version of a formula,
//! so `latest` resolves to that and any other exact version is a
//! discovery error. Bottle files become the release's assets, renamed so
//! the platform tokens (`darwin`/`linux`, `arm64`/`amd64`) are visible to
//! asset selection.

use anyhow::{bail, Result};

use super::{descriptor_cache, downloads_dir, fetch_assets, HOMEBREW, VERSION_LATEST, VERSION_UNKNOWN};
use crate::clients::{HomebrewClient, Release, ReleaseAsset};
use crate::config::Options;
use crate::resolve::strip_v;

#[derive(Debug)]
pub struct HomebrewSource {
    pub opts: Options,
    pub formula: String,
    pub version: String,
    pub release: Option<Release>,
}

impl HomebrewSource {
    pub fn new(opts: Options, formula: String, version: String) -> Self {
        Self {
            opts,
            formula,
            version,
            release: None,
        }
    }

    pub fn source(&self) -> String {
        HOMEBREW.to_string()
    }

    pub fn app(&self) -> String {
        self.formula.clone()
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

    fn client(&self) -> Result<HomebrewClient> {
        let cache = descriptor_cache(&self.opts, &self.id())?;
        Ok(HomebrewClient::new(Some(cache)))
    }

    pub async fn pre_run(&mut self) -> Result<()> {
        let client = self.client()?;
        let formula = client.formula(&self.formula).await?;
        let stable = formula.versions.stable.clone();

        if self.version != VERSION_LATEST && strip_v(&self.version) != stable {
            bail!(
                "homebrew serves only the current stable version of {} ({}), not {}",
                self.formula,
                stable,
                self.version
            );
        }

        let assets: Vec<ReleaseAsset> = formula
            .stable_bottle_files()
            .map(|(platform, file)| {
                let (os, arch) = platform_tokens(platform);
                ReleaseAsset {
                    id: 0,
                    name: format!("{}-{}-{}-{}.bottle.tar.gz", self.formula, stable, os, arch),
                    size: 0,
                    download_count: 0,
                    created_at: None,
                    uuid: None,
                    browser_download_url: file.url.clone(),
                }
            })
            .collect();

        if assets.is_empty() {
            bail!(
                "release found, but no assets found for {} version {}",
                self.app(),
                stable
            );
        }

        self.version = stable.clone();
        self.release = Some(Release {
            id: 0,
            tag_name: stable,
            name: self.formula.clone(),
            body: String::new(),
            draft: false,
            prerelease: false,
            created_at: None,
            published_at: None,
            assets,
        });

        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let release = self
            .release
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no release resolved for {}", self.app()))?;

        let dest = downloads_dir(&self.opts, &self.id(), &self.version)?;
        fetch_assets(&release.assets, &self.formula, &self.opts, &dest, None).await
    }
}

/// Map a bottle platform tag (`x86_64_linux`, `arm64_sequoia`, `sonoma`)
/// to the os/arch tokens the selector understands.
fn platform_tokens(platform: &str) -> (&'static str, &'static str) {
    let os = if platform.contains("linux") {
        "linux"
    } else {
        "darwin"
    };
    let arch = if platform.starts_with("arm64") {
        "arm64"
    } else {
        "amd64"
    };
    (os, arch)
}
