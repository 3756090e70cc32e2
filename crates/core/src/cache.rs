use async_trait::async_trait;
use moka::{Expiry, future::Cache as MokaCache};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can be reported by a [`VersionCache`] backend.
///
/// These are never surfaced to clients, callers are expected to log them
/// and carry on as if the cache did not exist.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing store could not be reached or refused the operation.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

/// A key-value store with per-entry expiry used to hold resolved versions.
#[async_trait]
pub trait VersionCache: Send + Sync {
    /// Read the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring it after `ttl`.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

type CacheValue = (String, Duration);

struct EntryExpiry;

impl Expiry<String, CacheValue> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.1)
    }

    // Overwrites restart the clock with the new entry's ttl.
    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.1)
    }
}

/// In-process [`VersionCache`] backed by [`moka`].
#[derive(Clone)]
pub struct MokaVersionCache {
    inner: MokaCache<String, CacheValue>,
}

impl MokaVersionCache {
    /// Create a new cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: MokaCache::builder()
                .expire_after(EntryExpiry)
                .max_capacity(max_capacity)
                .build(),
        }
    }
}

impl Default for MokaVersionCache {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl VersionCache for MokaVersionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.inner.get(key).await.map(|(value, _)| value))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner
            .insert(key.to_owned(), (value.to_owned(), ttl))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_stored_value() {
        let cache = MokaVersionCache::default();
        cache
            .put("latestVersion", "3.2.1", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("latestVersion").await.unwrap(),
            Some("3.2.1".to_string())
        );
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_key() {
        let cache = MokaVersionCache::default();
        assert_eq!(cache.get("latestVersion").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_existing_value() {
        let cache = MokaVersionCache::default();
        cache
            .put("latestVersion", "1.0.0", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .put("latestVersion", "1.0.1", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("latestVersion").await.unwrap(),
            Some("1.0.1".to_string())
        );
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = MokaVersionCache::default();
        cache
            .put("latestVersion", "3.2.1", Duration::from_millis(50))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(cache.get("latestVersion").await.unwrap(), None);
    }
}
