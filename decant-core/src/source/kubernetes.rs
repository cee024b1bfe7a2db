//! Kubernetes meta-source
//!
//! Versions come from the `kubernetes/kubernetes` GitHub releases, but the
//! binaries themselves are published on dl.k8s.io per platform, so after
//! discovery the asset is synthesized rather than taken from the release.

use anyhow::Result;

use super::{downloads_dir, fetch_assets, GitHubSource, KUBERNETES};
use crate::clients::ReleaseAsset;
use crate::config::Options;

const DL_BASE_URL: &str = "https://dl.k8s.io/release";

#[derive(Debug)]
pub struct KubernetesSource {
    pub github: GitHubSource,

    /// Which binary to install (kubectl, kubeadm, ...)
    pub app_name: String,
}

impl KubernetesSource {
    pub fn new(opts: Options, app_name: String, version: String) -> Self {
        Self {
            github: GitHubSource::new(
                opts,
                KUBERNETES.to_string(),
                KUBERNETES.to_string(),
                version,
            ),
            app_name,
        }
    }

    pub fn source(&self) -> String {
        KUBERNETES.to_string()
    }

    pub fn app(&self) -> String {
        format!("{}/{}", KUBERNETES, self.app_name)
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.source(), self.app())
    }

    pub fn version(&self) -> String {
        self.github.version()
    }

    pub async fn pre_run(&mut self) -> Result<()> {
        // dl.k8s.io serves the binaries; the GitHub release only pins the
        // version, so no asset check applies here.
        self.github.discover().await
    }

    pub async fn run(&mut self) -> Result<()> {
        if self.github.release.is_none() {
            anyhow::bail!("no release resolved for {}", self.app());
        }

        let opts = &self.github.opts;
        let version = &self.github.version;

        let binary = if opts.os == "windows" {
            format!("{}.exe", self.app_name)
        } else {
            self.app_name.clone()
        };

        let asset = ReleaseAsset {
            id: 0,
            name: format!("{}-{}-{}", self.app_name, opts.os, opts.arch),
            size: 0,
            download_count: 0,
            created_at: None,
            uuid: None,
            browser_download_url: format!(
                "{}/v{}/bin/{}/{}/{}",
                DL_BASE_URL, version, opts.os, opts.arch, binary
            ),
        };

        let dest = downloads_dir(opts, &self.id(), version)?;
        fetch_assets(&[asset], &self.app_name, opts, &dest, None).await
    }
}
