//! Asset download with digest bookkeeping
//!
//! One asset streams to disk while a SHA-256 accumulator sees the same
//! bytes; the hex digest lands in a `.sha256` sidecar next to the file
//! once the copy is complete. The sidecar's presence is what makes
//! re-runs cheap: if it already exists the download is skipped without
//! touching the network. An interrupted stream leaves a truncated file
//! and no sidecar, so a retry starts over instead of short-circuiting.

use anyhow::{Context, Result};
use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::clients::{ClientError, ReleaseAsset};

/// Where a download ended up
#[derive(Debug)]
pub struct Downloaded {
    pub path: PathBuf,

    /// Hex SHA-256 of the bytes written; `None` when the sidecar
    /// short-circuited the download
    pub digest: Option<String>,
}

/// Download `asset` into `dest_dir`.
///
/// The destination file name is the base name of the asset's download
/// URL. The `Authorization: token …` header is sent only when a token is
/// configured; the user agent is always sent.
pub async fn fetch(
    asset: &ReleaseAsset,
    dest_dir: &Path,
    token: Option<&str>,
) -> Result<Downloaded> {
    let url = &asset.browser_download_url;
    let filename = url.rsplit('/').next().unwrap_or(&asset.name);

    let path = dest_dir.join(filename);
    let sidecar = dest_dir.join(format!("{filename}.sha256"));

    if sidecar.exists() {
        tracing::debug!("file already downloaded: {}", path.display());
        return Ok(Downloaded { path, digest: None });
    }

    tracing::debug!("downloading asset: {}", url);

    let client = reqwest::Client::builder()
        .user_agent(crate::USER_AGENT)
        .build()
        .context("Failed to create HTTP client")?;

    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.header("Authorization", format!("token {token}"));
    }

    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to download {url}"))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(ClientError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        }
        .into());
    }

    let mut file = tokio::fs::File::create(&path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.with_context(|| format!("Download stream from {url} failed"))?;
        hasher.update(&chunk);
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    file.flush()
        .await
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    let digest = hex::encode(hasher.finalize());
    tokio::fs::write(&sidecar, &digest)
        .await
        .with_context(|| format!("Failed to write {}", sidecar.display()))?;

    tracing::trace!("downloaded {} (sha256 {})", path.display(), digest);

    Ok(Downloaded {
        path,
        digest: Some(digest),
    })
}
