//! Installed-version bookkeeping (inventory.yaml)
//!
//! A small lock file under the metadata directory records which versions
//! of which apps have been installed, keyed by the descriptor identity.
//! The install driver consults it to short-circuit an already-installed
//! version unless `--force` is given.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const INVENTORY_FILE: &str = "inventory.yaml";

/// The inventory lock file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Installed binaries, one entry per app identity
    #[serde(default)]
    pub installed: Vec<InstalledBinary>,
}

/// One installed binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledBinary {
    /// Descriptor identity: `source/owner/repo`
    pub id: String,

    /// Installed version (v-stripped)
    pub version: String,

    /// When the install completed (RFC 3339)
    pub installed_at: String,
}

impl Inventory {
    /// Inventory path under a metadata directory
    pub fn path_in(metadata_dir: &Path) -> PathBuf {
        metadata_dir.join(INVENTORY_FILE)
    }

    /// Load from `path`, or an empty inventory when no file exists.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).context("Failed to read inventory")?;

        serde_yaml_ng::from_str(&content).context("Failed to parse inventory")
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write inventory: {}", path.display()))?;

        Ok(())
    }

    /// The installed entry for an app identity, if any
    pub fn get(&self, id: &str) -> Option<&InstalledBinary> {
        self.installed.iter().find(|e| e.id == id)
    }

    /// Whether `id` is installed at exactly `version`
    pub fn is_installed(&self, id: &str, version: &str) -> bool {
        self.get(id).map_or(false, |e| e.version == version)
    }

    /// Record an install, replacing any previous entry for the same app.
    pub fn record(&mut self, id: &str, version: &str) {
        self.installed.retain(|e| e.id != id);
        self.installed.push(InstalledBinary {
            id: id.to_string(),
            version: version.to_string(),
            installed_at: chrono::Utc::now().to_rfc3339(),
        });
    }
}
