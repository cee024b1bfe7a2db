//! Release discovery
//!
//! One algorithm, written once, generic over the host client: given a
//! requested version (`latest` or exact) and a prerelease policy, produce
//! exactly one release or fail with "release not found".
//!
//! Policy:
//!
//! 1. `latest` with prereleases excluded asks the host's dedicated latest
//!    endpoint. A 404 there is not an error: some hosts answer it for
//!    repositories that have never published a full release, so discovery
//!    falls through to the listing walk. Any other failure propagates.
//! 2. Everything else walks the paginated listing in host order (assumed
//!    newest first, never re-sorted client-side). Under
//!    `include_prereleases` + `latest` the first prerelease wins;
//!    otherwise the first entry whose `v`-stripped tag equals the
//!    `v`-stripped requested version wins.
//!
//! The fallback from step 1 keeps the literal requested string `latest`,
//! which no tag ever equals, so a repository whose latest endpoint 404s
//! resolves to "release not found" when prereleases are excluded even if
//! releases exist. Long-standing behavior, kept on purpose; the
//! integration suite pins it.

use anyhow::{bail, Result};

use crate::clients::{Release, ReleaseClient};
use crate::source::VERSION_LATEST;

/// The outcome of discovery: the release plus the version string the
/// caller should adopt (the `v`-stripped tag when a latest path resolved
/// it, the requested string otherwise).
#[derive(Debug)]
pub struct Discovery {
    pub release: Release,
    pub version: String,
}

/// Strip a single leading `v` from a version tag.
///
/// Only a `v` that actually prefixes a version number is stripped, so the
/// normalization is idempotent and leaves tags like `version-1` alone.
pub fn strip_v(tag: &str) -> &str {
    match tag.strip_prefix('v') {
        Some(rest) if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) => rest,
        _ => tag,
    }
}

/// Resolve `requested` against the host, per the policy above.
pub async fn find_release(
    client: &dyn ReleaseClient,
    owner: &str,
    repo: &str,
    requested: &str,
    include_prereleases: bool,
) -> Result<Discovery> {
    if requested == VERSION_LATEST && !include_prereleases {
        match client.latest_release(owner, repo).await {
            Ok(release) => {
                let version = strip_v(&release.tag_name).to_string();
                return Ok(Discovery { release, version });
            }
            Err(err) if err.is_not_found() => {
                tracing::debug!("no latest release for {}/{}, falling back to listing", owner, repo);
            }
            Err(err) => return Err(err.into()),
        }
    }

    find_release_in_list(client, owner, repo, requested, include_prereleases).await
}

async fn find_release_in_list(
    client: &dyn ReleaseClient,
    owner: &str,
    repo: &str,
    requested: &str,
    include_prereleases: bool,
) -> Result<Discovery> {
    let releases = match client.list_releases(owner, repo).await {
        Ok(releases) => releases,
        Err(err) => {
            if err.is_not_found() && !client.has_token() {
                tracing::warn!(
                    "no authentication token provided, a 404 error may be due to permissions"
                );
            }
            return Err(err.into());
        }
    };

    for release in releases {
        tracing::trace!(owner, repo, "found release: {}", release.tag_name);

        if requested == VERSION_LATEST && include_prereleases && release.prerelease {
            let version = strip_v(&release.tag_name).to_string();
            return Ok(Discovery { release, version });
        }

        if strip_v(&release.tag_name) == strip_v(requested) {
            return Ok(Discovery {
                release,
                version: requested.to_string(),
            });
        }
    }

    bail!("release not found")
}
