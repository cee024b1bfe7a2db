//! Homebrew formula client
//!
//! formulae.brew.sh is not a release host: it serves one JSON document per
//! formula describing the current stable version and its prebuilt bottles.
//! There is no history to list, so this client does not implement
//! [`super::ReleaseClient`]; the Homebrew descriptor resolves through the
//! formula lookup directly.

use serde::Deserialize;
use std::collections::HashMap;

use super::{check_base_url, ClientError, Transport};
use crate::cache::HttpCache;

pub const HOMEBREW_BASE_URL: &str = "https://formulae.brew.sh";

#[derive(Debug, Deserialize)]
pub struct Formula {
    pub name: String,

    pub versions: FormulaVersions,

    #[serde(default)]
    pub bottle: HashMap<String, Bottle>,
}

#[derive(Debug, Deserialize)]
pub struct FormulaVersions {
    pub stable: String,
}

#[derive(Debug, Deserialize)]
pub struct Bottle {
    /// Bottle files keyed by platform tag, e.g. `x86_64_linux`,
    /// `arm64_sequoia`.
    #[serde(default)]
    pub files: HashMap<String, BottleFile>,
}

#[derive(Debug, Deserialize)]
pub struct BottleFile {
    pub url: String,

    #[serde(default)]
    pub sha256: String,
}

impl Formula {
    /// Bottle files of the stable bottle, if the formula ships one.
    pub fn stable_bottle_files(&self) -> impl Iterator<Item = (&String, &BottleFile)> {
        self.bottle
            .get("stable")
            .into_iter()
            .flat_map(|bottle| bottle.files.iter())
    }
}

pub struct HomebrewClient {
    transport: Transport,
    base_url: String,
}

impl HomebrewClient {
    pub fn new(cache: Option<HttpCache>) -> Self {
        Self {
            transport: Transport::new(None, cache),
            base_url: HOMEBREW_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root, mainly for tests.
    pub fn with_base_url(base_url: &str, cache: Option<HttpCache>) -> Result<Self, ClientError> {
        Ok(Self {
            transport: Transport::new(None, cache),
            base_url: check_base_url(base_url)?,
        })
    }

    /// Fetch the formula document for `name`.
    pub async fn formula(&self, name: &str) -> Result<Formula, ClientError> {
        let url = format!("{}/api/formula/{}.json", self.base_url, name);
        self.transport.get_json(&url).await
    }
}
