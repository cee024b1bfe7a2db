//! Provider-typed source descriptors
//!
//! A [`Source`] is the resolved, provider-typed handle for one
//! application: it knows which host to talk to, how to discover releases
//! there, and how to fetch the chosen asset. The provider set is closed
//! and selected once at parse time, so this is a sum type rather than
//! trait objects.
//!
//! Every variant honors the same contract:
//! - `source()` - canonical or user-configured provider name
//! - `app()` - stable `owner/repo`-style application identity
//! - `id()` - `source/owner/repo`, the cache and inventory key
//! - `version()` - `unknown` until discovery has stored a release
//! - `pre_run()` - discovery: resolve exactly one release with assets
//! - `run()` - selection + download of the asset for the target platform

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cache::HttpCache;
use crate::clients::ReleaseAsset;
use crate::config::Options;
use crate::{download, select};

mod forgejo;
mod github;
mod gitlab;
mod hashicorp;
mod helm;
mod homebrew;
mod kubernetes;

pub use forgejo::ForgejoSource;
pub use github::GitHubSource;
pub use gitlab::GitLabSource;
pub use hashicorp::HashicorpSource;
pub use helm::HelmSource;
pub use homebrew::HomebrewSource;
pub use kubernetes::KubernetesSource;

/// The version requested when the user did not pin one
pub const VERSION_LATEST: &str = "latest";

/// Sentinel reported while no release has been resolved
pub const VERSION_UNKNOWN: &str = "unknown";

pub const GITHUB: &str = "github";
pub const GITLAB: &str = "gitlab";
pub const FORGEJO: &str = "forgejo";
pub const CODEBERG: &str = "codeberg";
pub const HOMEBREW: &str = "homebrew";
pub const HASHICORP: &str = "hashicorp";
pub const KUBERNETES: &str = "kubernetes";
pub const HELM: &str = "helm";

pub const CODEBERG_BASE_URL: &str = "https://codeberg.org/api/v1";

/// The closed set of provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    GitHub,
    GitLab,
    Forgejo,
    Homebrew,
    Hashicorp,
    Kubernetes,
    Helm,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::GitHub => GITHUB,
            SourceKind::GitLab => GITLAB,
            SourceKind::Forgejo => FORGEJO,
            SourceKind::Homebrew => HOMEBREW,
            SourceKind::Hashicorp => HASHICORP,
            SourceKind::Kubernetes => KUBERNETES,
            SourceKind::Helm => HELM,
        };
        f.write_str(name)
    }
}

/// One resolved install source
#[derive(Debug)]
pub enum Source {
    GitHub(GitHubSource),
    GitLab(GitLabSource),
    Forgejo(ForgejoSource),
    Homebrew(HomebrewSource),
    Hashicorp(HashicorpSource),
    Kubernetes(KubernetesSource),
    Helm(HelmSource),
}

impl Source {
    /// Provider name; a configured custom-provider name wins over the
    /// built-in one.
    pub fn source(&self) -> String {
        match self {
            Source::GitHub(s) => s.source(),
            Source::GitLab(s) => s.source(),
            Source::Forgejo(s) => s.source(),
            Source::Homebrew(s) => s.source(),
            Source::Hashicorp(s) => s.source(),
            Source::Kubernetes(s) => s.source(),
            Source::Helm(s) => s.source(),
        }
    }

    /// Stable application identity (`owner/repo` or equivalent)
    pub fn app(&self) -> String {
        match self {
            Source::GitHub(s) => s.app(),
            Source::GitLab(s) => s.app(),
            Source::Forgejo(s) => s.app(),
            Source::Homebrew(s) => s.app(),
            Source::Hashicorp(s) => s.app(),
            Source::Kubernetes(s) => s.app(),
            Source::Helm(s) => s.app(),
        }
    }

    /// Cache and inventory key: `source/owner/repo`
    pub fn id(&self) -> String {
        format!("{}/{}", self.source(), self.app())
    }

    /// Resolved version, or `unknown` before discovery
    pub fn version(&self) -> String {
        match self {
            Source::GitHub(s) => s.version(),
            Source::GitLab(s) => s.version(),
            Source::Forgejo(s) => s.version(),
            Source::Homebrew(s) => s.version(),
            Source::Hashicorp(s) => s.version(),
            Source::Kubernetes(s) => s.version(),
            Source::Helm(s) => s.version(),
        }
    }

    /// Discovery: resolve the requested version to exactly one release
    /// carrying at least one asset. Calling again re-resolves.
    pub async fn pre_run(&mut self) -> Result<()> {
        match self {
            Source::GitHub(s) => s.pre_run().await,
            Source::GitLab(s) => s.pre_run().await,
            Source::Forgejo(s) => s.pre_run().await,
            Source::Homebrew(s) => s.pre_run().await,
            Source::Hashicorp(s) => s.pre_run().await,
            Source::Kubernetes(s) => s.pre_run().await,
            Source::Helm(s) => s.pre_run().await,
        }
    }

    /// Select the asset for the target platform and download it.
    pub async fn run(&mut self) -> Result<()> {
        match self {
            Source::GitHub(s) => s.run().await,
            Source::GitLab(s) => s.run().await,
            Source::Forgejo(s) => s.run().await,
            Source::Homebrew(s) => s.run().await,
            Source::Hashicorp(s) => s.run().await,
            Source::Kubernetes(s) => s.run().await,
            Source::Helm(s) => s.run().await,
        }
    }
}

/// Discovery cache scoped to one descriptor identity
pub(crate) fn descriptor_cache(opts: &Options, id: &str) -> Result<HttpCache> {
    Ok(HttpCache::new(&opts.config.metadata_path()?, id))
}

/// `{downloads}/{source}/{owner}/{repo}/{version}` for one descriptor
pub(crate) fn downloads_dir(opts: &Options, id: &str, version: &str) -> Result<PathBuf> {
    Ok(opts.config.downloads_path()?.join(id).join(version))
}

/// Shared tail of every `run()`: pick the asset for the platform and
/// stream it into the downloads directory.
pub(crate) async fn fetch_assets(
    assets: &[ReleaseAsset],
    app_hint: &str,
    opts: &Options,
    dest: &Path,
    token: Option<&str>,
) -> Result<()> {
    let asset = select::pick(assets, app_hint, &opts.os, &opts.arch, opts.asset.as_deref())?;

    tokio::fs::create_dir_all(dest)
        .await
        .with_context(|| format!("Failed to create downloads directory: {}", dest.display()))?;

    let outcome = download::fetch(asset, dest, token).await?;
    tracing::info!("downloaded: {}", outcome.path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options() -> Options {
        Options::new(crate::Config::default())
    }

    #[test]
    fn test_source_kind_parses_lowercase() {
        let kind: SourceKind = serde_yaml_ng::from_str("forgejo").unwrap();
        assert_eq!(kind, SourceKind::Forgejo);
        assert_eq!(kind.to_string(), "forgejo");
    }

    #[test]
    fn test_id_is_source_then_app() {
        let source = Source::GitHub(GitHubSource::new(
            options(),
            "ekristen".to_string(),
            "aws-nuke".to_string(),
            VERSION_LATEST.to_string(),
        ));

        assert_eq!(source.app(), "ekristen/aws-nuke");
        assert_eq!(source.id(), "github/ekristen/aws-nuke");
    }

    #[test]
    fn test_version_unknown_before_discovery() {
        let source = Source::GitHub(GitHubSource::new(
            options(),
            "ekristen".to_string(),
            "aws-nuke".to_string(),
            VERSION_LATEST.to_string(),
        ));

        assert_eq!(source.version(), VERSION_UNKNOWN);
    }

    #[test]
    fn test_custom_provider_name_wins() {
        let source = Source::Forgejo(ForgejoSource::new(
            options(),
            "https://git.example.com/api/v1".to_string(),
            Some("myforgejo".to_string()),
            "owner".to_string(),
            "repo".to_string(),
            VERSION_LATEST.to_string(),
        ));

        assert_eq!(source.source(), "myforgejo");
        assert_eq!(source.id(), "myforgejo/owner/repo");
    }

    #[test]
    fn test_forgejo_source_defaults_to_builtin_name() {
        let source = Source::Forgejo(ForgejoSource::new(
            options(),
            "https://git.example.com/api/v1".to_string(),
            None,
            "owner".to_string(),
            "repo".to_string(),
            VERSION_LATEST.to_string(),
        ));

        assert_eq!(source.source(), "forgejo");
    }
}
