//! Helm meta-source
//!
//! Same split as Kubernetes: versions come from the `helm/helm` GitHub
//! releases, the tarballs live on get.helm.sh.

use anyhow::Result;

use super::{downloads_dir, fetch_assets, GitHubSource, HELM};
use crate::clients::ReleaseAsset;
use crate::config::Options;

const GET_HELM_BASE_URL: &str = "https://get.helm.sh";

#[derive(Debug)]
pub struct HelmSource {
    pub github: GitHubSource,
    pub app_name: String,
}

impl HelmSource {
    pub fn new(opts: Options, app_name: String, version: String) -> Self {
        Self {
            github: GitHubSource::new(opts, HELM.to_string(), HELM.to_string(), version),
            app_name,
        }
    }

    pub fn source(&self) -> String {
        HELM.to_string()
    }

    pub fn app(&self) -> String {
        format!("{}/{}", HELM, self.app_name)
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.source(), self.app())
    }

    pub fn version(&self) -> String {
        self.github.version()
    }

    pub async fn pre_run(&mut self) -> Result<()> {
        self.github.discover().await
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.github.release.is_none() {
            anyhow::bail!("no release resolved for {}", self.app());
        }

        let opts = &self.github.opts;
        let version = &self.github.version;

        let ext = if opts.os == "windows" { "zip" } else { "tar.gz" };
        let name = format!("helm-v{}-{}-{}.{}", version, opts.os, opts.arch, ext);

        let asset = ReleaseAsset {
            id: 0,
            name: name.clone(),
            size: 0,
            download_count: 0,
            created_at: None,
            uuid: None,
            browser_download_url: format!("{}/{}", GET_HELM_BASE_URL, name),
        };

        let dest = downloads_dir(opts, &self.id(), version)?;
        fetch_assets(&[asset], &self.app_name, opts, &dest, None).await
    }
}
