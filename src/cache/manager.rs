//! Cache manager for persisting HTTP responses to disk
//!
//! Provides a `ResponseCache` that memoizes successful GET responses as JSON
//! files with a fixed TTL, degrading to live-only fetching when storage is
//! unusable. Corrupt or stale entries are treated exactly like misses and
//! never surface an error to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::fetch::{Response, Transport, TransportError};

/// How long a cached response stays fresh
pub const CACHE_TTL: Duration = Duration::from_secs(300);

/// Wrapper struct for cached responses stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// When the response was cached
    timestamp: DateTime<Utc>,
    /// The cached response
    response: Response,
}

/// Borrowing twin of `CacheEntry` so writes don't clone the response body.
#[derive(Serialize)]
struct CacheEntryRef<'a> {
    timestamp: DateTime<Utc>,
    response: &'a Response,
}

/// Whether caching is active, decided once at construction
#[derive(Debug, Clone)]
enum CacheMode {
    /// Entries are read from and written to this directory
    Enabled(PathBuf),
    /// Every `get` goes straight to the live transport
    Disabled,
}

/// Disk-backed memoization of GET requests
///
/// Each URL maps to one file named by the SHA-256 hex digest of the URL
/// string. Entries older than the TTL, or entries that cannot be parsed, are
/// refetched and overwritten; a failed refetch leaves the old entry in place
/// for the next call. Non-2xx responses are never persisted.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    mode: CacheMode,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates a cache rooted at `cache_dir`, or a disabled cache when no
    /// directory is given or the directory cannot be created.
    ///
    /// The mode is fixed here; "cache disabled" is logged once and `get`
    /// does no further hit/miss logging in disabled mode.
    pub fn new(cache_dir: Option<PathBuf>) -> Self {
        let mode = match cache_dir {
            Some(dir) => match fs::create_dir_all(&dir) {
                Ok(()) => CacheMode::Enabled(dir),
                Err(err) => {
                    warn!("cache disabled: cache directory unusable: {err}");
                    CacheMode::Disabled
                }
            },
            None => {
                debug!("cache disabled: no cache directory configured");
                CacheMode::Disabled
            }
        };
        Self {
            mode,
            ttl: CACHE_TTL,
        }
    }

    /// Creates a cache with a custom directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    #[allow(dead_code)]
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self::new(Some(cache_dir))
    }

    /// Creates a cache that always fetches live
    #[allow(dead_code)]
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Overrides the TTL; used by tests to force staleness.
    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the cached response for `url` if fresh, otherwise performs a
    /// live request through `transport`.
    ///
    /// Live 2xx responses are persisted best-effort before being returned;
    /// a failed write is logged and ignored. Only transport errors propagate
    /// to the caller — cache corruption never does.
    pub async fn get(
        &self,
        transport: &dyn Transport,
        url: &str,
    ) -> Result<Response, TransportError> {
        let dir = match &self.mode {
            CacheMode::Enabled(dir) => dir.clone(),
            CacheMode::Disabled => return transport.get(url).await,
        };

        let path = dir.join(format!("{}.json", Self::cache_key(url)));
        if let Some(response) = self.read_fresh(&path) {
            debug!(url, "cache hit");
            return Ok(response);
        }

        let response = transport.get(url).await?;
        if response.success() {
            debug!(url, "caching response");
            if let Err(err) = Self::store(&path, &response) {
                warn!(url, "failed to write cache entry: {err}");
            }
        }
        Ok(response)
    }

    /// Deterministic cache key: hex digest of the URL string.
    fn cache_key(url: &str) -> String {
        format!("{:x}", Sha256::digest(url.as_bytes()))
    }

    /// Reads the entry at `path`, returning `None` when it is missing,
    /// unparseable, or older than the TTL.
    fn read_fresh(&self, path: &Path) -> Option<Response> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                debug!("cache miss");
                return None;
            }
        };
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                debug!("cache entry unreadable, treating as stale: {err}");
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(entry.timestamp);
        match age.to_std() {
            Ok(age) if age <= self.ttl => Some(entry.response),
            // Older than the TTL, or a timestamp from the future (clock skew).
            _ => {
                debug!("cache stale");
                None
            }
        }
    }

    fn store(path: &Path, response: &Response) -> std::io::Result<()> {
        let entry = CacheEntryRef {
            timestamp: Utc::now(),
            response,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}
