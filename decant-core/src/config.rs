//! Configuration loading and per-invocation options
//!
//! The config file is YAML, loaded from the platform config directory (or
//! an explicit `--config` path) and fully defaulted when absent. Everything
//! the engine consumes is a typed field here; nothing downstream looks up
//! string-keyed settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::source::SourceKind;

/// Configuration file (decant.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider assumed for bare `owner/repo` (and single-segment)
    /// identifiers
    #[serde(default = "default_source")]
    pub default_source: String,

    /// Named custom providers: a self-hosted Forgejo/GitLab instance under
    /// a name usable as an identifier prefix
    #[serde(default)]
    pub providers: HashMap<String, CustomProvider>,

    /// Shorthand names: alias -> `owner/repo[@version]`
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Root under which downloads/, metadata/, and bin/ live.
    /// Defaults to the platform data directory.
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// API tokens per provider family. The CLI also honors
    /// DECANT_GITHUB_TOKEN / DECANT_GITLAB_TOKEN / DECANT_FORGEJO_TOKEN.
    #[serde(default)]
    pub github_token: Option<String>,

    #[serde(default)]
    pub gitlab_token: Option<String>,

    #[serde(default)]
    pub forgejo_token: Option<String>,
}

/// A user-configured provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomProvider {
    /// Which API family the endpoint speaks
    pub provider: SourceKind,

    /// API root, e.g. `https://git.example.com/api/v1`
    pub base_url: String,
}

/// A resolved alias: the replacement identifier plus an optional pinned
/// version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub version: Option<String>,
}

fn default_source() -> String {
    "github".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            providers: HashMap::new(),
            aliases: HashMap::new(),
            data_path: None,
            github_token: None,
            gitlab_token: None,
            forgejo_token: None,
        }
    }
}

impl Config {
    /// Load from the default location, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_config_path()?)
    }

    /// Load from a specific path, or defaults when no file exists there.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Default config file path (`<config dir>/decant/decant.yaml`)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("sh", "decant", "decant")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("decant")))
            .context("Could not determine config directory")?;

        Ok(config_dir.join("decant.yaml"))
    }

    /// Look up an alias by name, splitting an optional `@version` pin.
    pub fn get_alias(&self, name: &str) -> Option<Alias> {
        let target = self.aliases.get(name)?;

        match target.split_once('@') {
            Some((base, version)) => Some(Alias {
                name: base.to_string(),
                version: Some(version.to_string()),
            }),
            None => Some(Alias {
                name: target.clone(),
                version: None,
            }),
        }
    }

    /// Root data directory
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_path {
            return Ok(path.clone());
        }

        directories::ProjectDirs::from("sh", "decant", "decant")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .or_else(|| dirs::data_dir().map(|d| d.join("decant")))
            .context("Could not determine data directory")
    }

    /// Where downloaded assets land
    pub fn downloads_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("downloads"))
    }

    /// Where discovery caches and the inventory live
    pub fn metadata_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("metadata"))
    }

    /// Where installed binaries are linked
    pub fn bin_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("bin"))
    }

    /// Create the directory tree decant writes into.
    pub fn mkdir_all(&self) -> Result<()> {
        for dir in [
            self.downloads_path()?,
            self.metadata_path()?,
            self.bin_path()?,
        ] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        Ok(())
    }
}

/// Per-invocation inputs, resolved once at the CLI boundary
#[derive(Debug, Clone)]
pub struct Options {
    /// Target operating system (GOOS-style: linux, darwin, windows)
    pub os: String,

    /// Target architecture (amd64, arm64, ...)
    pub arch: String,

    /// Consider prereleases when resolving `latest`
    pub include_prereleases: bool,

    /// Exact asset name, bypassing auto-selection
    pub asset: Option<String>,

    pub config: Config,
}

impl Options {
    pub fn new(config: Config) -> Self {
        Self {
            os: host_os().to_string(),
            arch: host_arch().to_string(),
            include_prereleases: false,
            asset: None,
            config,
        }
    }
}

/// Host OS in the naming releases actually use
pub fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Host architecture in the naming releases actually use
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}
