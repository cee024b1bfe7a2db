//! Disk-backed cache for discovery requests
//!
//! Repeated installs of the same app hit the same handful of release-listing
//! URLs. Responses are cached on disk under the metadata directory, keyed by
//! the owning descriptor's identity, so re-runs stay cheap and do not eat
//! into API rate limits. The cache is a transport concern: release clients
//! consult it inside their GET path and the resolver never sees it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Default cache TTL (15 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// A cached response body with its storage timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// When the entry was stored (Unix timestamp)
    cached_at: u64,

    /// The response body as received
    body: String,
}

/// Read-through disk cache for GET responses
#[derive(Debug, Clone)]
pub struct HttpCache {
    dir: PathBuf,
    ttl: Duration,
}

impl HttpCache {
    /// Create a cache rooted under `metadata_dir`, scoped to one descriptor
    /// identity (e.g. `github/ekristen/aws-nuke`).
    pub fn new(metadata_dir: &Path, id: &str) -> Self {
        Self {
            dir: metadata_dir.join("cache").join(id),
            ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Override the TTL, mainly for tests.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cache file path for a URL
    fn entry_path(&self, url: &str) -> PathBuf {
        use sha2::{Digest, Sha256};

        let digest = Sha256::digest(url.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(&digest[..8])))
    }

    /// Return the cached body for `url` if present and not expired.
    ///
    /// Corrupt or stale entries are treated as misses.
    pub fn lookup(&self, url: &str) -> Option<String> {
        let path = self.entry_path(url);
        let content = std::fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let age = Duration::from_secs(now.saturating_sub(entry.cached_at));
        if age > self.ttl {
            tracing::debug!("cache expired for {} (age: {:?})", url, age);
            return None;
        }

        tracing::debug!("cache hit for {} (age: {:?})", url, age);
        Some(entry.body)
    }

    /// Store a response body for `url`. Caching is best effort: a failed
    /// write only warns.
    pub fn store(&self, url: &str, body: &str) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let entry = CacheEntry {
            cached_at: now,
            body: body.to_string(),
        };

        let result = std::fs::create_dir_all(&self.dir)
            .and_then(|_| {
                let content = serde_json::to_string(&entry)?;
                std::fs::write(self.entry_path(url), content)
            });

        if let Err(e) = result {
            tracing::warn!("failed to write response cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_miss_on_empty_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(temp_dir.path(), "github/owner/repo");

        assert!(cache.lookup("https://example.com/releases").is_none());
    }

    #[test]
    fn test_store_then_lookup() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(temp_dir.path(), "github/owner/repo");

        cache.store("https://example.com/releases", "[]");
        assert_eq!(
            cache.lookup("https://example.com/releases").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_urls_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(temp_dir.path(), "github/owner/repo");

        cache.store("https://example.com/a", "body-a");
        cache.store("https://example.com/b", "body-b");

        assert_eq!(cache.lookup("https://example.com/a").as_deref(), Some("body-a"));
        assert_eq!(cache.lookup("https://example.com/b").as_deref(), Some("body-b"));
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache =
            HttpCache::new(temp_dir.path(), "github/owner/repo").with_ttl(Duration::from_secs(60));

        // An entry stamped at the Unix epoch is long past any sane TTL.
        let path = cache.entry_path("https://example.com/releases");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"cached_at":0,"body":"[]"}"#).unwrap();

        assert!(cache.lookup("https://example.com/releases").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(temp_dir.path(), "github/owner/repo");

        cache.store("https://example.com/releases", "[]");
        std::fs::write(cache.entry_path("https://example.com/releases"), "not json").unwrap();

        assert!(cache.lookup("https://example.com/releases").is_none());
    }

    #[test]
    fn test_descriptor_identities_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let a = HttpCache::new(temp_dir.path(), "github/owner/repo");
        let b = HttpCache::new(temp_dir.path(), "codeberg/owner/repo");

        a.store("https://example.com/releases", "from-a");
        assert!(b.lookup("https://example.com/releases").is_none());
    }
}
