//! The install driver
//!
//! Resolves the identifier (alias table first), runs discovery, checks
//! the inventory for an already-installed version, then downloads the
//! selected asset and records the result.

use anyhow::Result;
use clap::Args;
use std::time::Instant;

use decant_core::inventory::Inventory;
use decant_core::source::VERSION_LATEST;
use decant_core::{ident, Config, Options};

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// What to install: [provider/]owner/repo[@version], or an alias
    pub identifier: String,

    /// Specify the OS to install for (default: the current one)
    #[clap(long)]
    pub os: Option<String>,

    /// Specify the architecture to install for (default: the current one)
    #[clap(long)]
    pub arch: Option<String>,

    /// Include pre-releases when resolving "latest"
    #[clap(long, alias = "pre")]
    pub include_pre_releases: bool,

    /// The exact name of the asset to use, when auto-detection fails
    #[clap(long)]
    pub asset: Option<String>,

    /// Install even if this version is already installed
    #[clap(long)]
    pub force: bool,

    /// GitHub token for API requests
    #[clap(long, env = "DECANT_GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitLab token for API requests
    #[clap(long, env = "DECANT_GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: Option<String>,

    /// Forgejo token for API requests
    #[clap(long, env = "DECANT_FORGEJO_TOKEN", hide_env_values = true)]
    pub forgejo_token: Option<String>,
}

pub async fn execute(args: InstallArgs, mut config: Config) -> Result<()> {
    let start = Instant::now();

    // Flag/env tokens win over the config file.
    if args.github_token.is_some() {
        config.github_token = args.github_token.clone();
    }
    if args.gitlab_token.is_some() {
        config.gitlab_token = args.gitlab_token.clone();
    }
    if args.forgejo_token.is_some() {
        config.forgejo_token = args.forgejo_token.clone();
    }

    config.mkdir_all()?;

    let identifier = ident::apply_alias(&args.identifier, &config);

    let mut opts = Options::new(config);
    if let Some(os) = &args.os {
        opts.os = os.clone();
    }
    if let Some(arch) = &args.arch {
        opts.arch = arch.clone();
    }
    opts.include_prereleases = args.include_pre_releases;
    opts.asset = args.asset.clone();

    let mut source = ident::parse(&identifier, &opts)?;

    if args.include_pre_releases {
        tracing::info!("   flag: including pre-releases");
    }

    tracing::info!("source: {}", source.source());
    tracing::info!("app: {}", source.app());
    tracing::info!("os: {}", opts.os);
    tracing::info!("arch: {}", opts.arch);

    let requested = identifier
        .split_once('@')
        .map(|(_, v)| v.to_string())
        .unwrap_or_else(|| VERSION_LATEST.to_string());

    if requested == VERSION_LATEST {
        tracing::info!("determining latest version");
    } else {
        tracing::info!("version: {}", requested);
    }

    source.pre_run().await?;

    if requested == VERSION_LATEST {
        tracing::info!("version: {}", source.version());
    }

    let inventory_path = Inventory::path_in(&opts.config.metadata_path()?);
    let mut inventory = Inventory::load_from_path(&inventory_path)?;

    if !args.force && inventory.is_installed(&source.id(), &source.version()) {
        tracing::warn!("already installed");
        tracing::info!("reinstall with --force ({:?})", start.elapsed());
        return Ok(());
    }

    source.run().await?;

    inventory.record(&source.id(), &source.version());
    inventory.save_to_path(&inventory_path)?;

    tracing::info!("installation complete in {:?}", start.elapsed());

    Ok(())
}
