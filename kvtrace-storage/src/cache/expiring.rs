//! TTL-bound memoizing cache over an external fetch operation.

use kvtrace_core::{access_key, cache_key, decode_i64, decode_utf8, KvTraceResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::Fetcher;
use crate::store::KeyValueStore;

/// Configuration for the expiring fetch cache.
#[derive(Debug, Clone)]
pub struct FetchCacheConfig {
    /// TTL applied to cached content at write time.
    pub ttl: Duration,
}

impl Default for FetchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(10),
        }
    }
}

impl FetchCacheConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the content TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Memoizes an external fetch operation with a TTL-bound cache and a
/// per-resource access counter.
///
/// Every call to [`get_or_fetch`](Self::get_or_fetch) increments the
/// resource's access counter, hit or miss, and the counter is never reset.
/// Expiry is pull-based: whoever reads next decides the entry is gone.
/// Concurrent misses for the same resource may each invoke the fetcher;
/// there is no single-flight deduplication.
pub struct ExpiringFetchCache<S: KeyValueStore, F: Fetcher> {
    store: Arc<S>,
    fetcher: F,
    config: FetchCacheConfig,
}

impl<S: KeyValueStore, F: Fetcher> ExpiringFetchCache<S, F> {
    /// Create a new fetch cache over the given store and fetcher.
    pub fn new(store: Arc<S>, fetcher: F, config: FetchCacheConfig) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    /// Create a new fetch cache with the default 10-second TTL.
    pub fn with_defaults(store: Arc<S>, fetcher: F) -> Self {
        Self::new(store, fetcher, FetchCacheConfig::default())
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &FetchCacheConfig {
        &self.config
    }

    /// Return `resource`'s content, from cache when fresh, from the
    /// fetcher otherwise.
    ///
    /// On a miss the fetched content is written back with the configured
    /// TTL. If the fetcher fails, nothing is written, the access counter
    /// increment stays (an access was attempted), and the error
    /// propagates.
    pub async fn get_or_fetch(&self, resource: &str) -> KvTraceResult<String> {
        let accesses = self.store.incr(&access_key(resource)).await?;

        let content_key = cache_key(resource);
        if let Some(cached) = self.store.get(&content_key).await? {
            debug!(resource, accesses, "fetch cache hit");
            return Ok(decode_utf8(&cached)?);
        }

        debug!(resource, accesses, "fetch cache miss");
        let content = self.fetcher.fetch(resource).await?;
        self.store
            .set_with_ttl(&content_key, content.clone().into_bytes(), self.config.ttl)
            .await?;
        Ok(content)
    }

    /// How many times `resource` was requested through this cache key
    /// space (0 when never accessed).
    pub async fn access_count(&self, resource: &str) -> KvTraceResult<i64> {
        match self.store.get(&access_key(resource)).await? {
            Some(raw) => Ok(decode_i64(&raw)?),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use async_trait::async_trait;
    use kvtrace_core::{FetchError, KvTraceError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Scripted fetch collaborator: counts invocations, returns templated
    // content or a scripted failure.
    struct ScriptedFetcher {
        invocations: AtomicUsize,
        fail: bool,
    }

    impl ScriptedFetcher {
        fn new() -> Self {
            Self {
                invocations: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                invocations: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn invocations(&self) -> usize {
            self.invocations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for &ScriptedFetcher {
        async fn fetch(&self, resource: &str) -> Result<String, FetchError> {
            let n = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(FetchError::Upstream {
                    resource: resource.to_string(),
                    reason: "scripted failure".to_string(),
                });
            }
            Ok(format!("content of {resource} (fetch #{n})"))
        }
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_a_hit() {
        let store = Arc::new(InMemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        let cache = ExpiringFetchCache::with_defaults(store, &fetcher);

        let first = cache.get_or_fetch("http://example.com/X").await.unwrap();
        let second = cache.get_or_fetch("http://example.com/X").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.invocations(), 1);
        assert_eq!(cache.access_count("http://example.com/X").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_refetch() {
        let store = Arc::new(InMemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        let config = FetchCacheConfig::new().with_ttl(Duration::from_millis(40));
        let cache = ExpiringFetchCache::new(store, &fetcher, config);

        cache.get_or_fetch("r").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.get_or_fetch("r").await.unwrap();

        assert_eq!(fetcher.invocations(), 2);
        assert_eq!(cache.access_count("r").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_counts_access_and_caches_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let fetcher = ScriptedFetcher::failing();
        let cache = ExpiringFetchCache::with_defaults(Arc::clone(&store), &fetcher);

        let err = cache.get_or_fetch("r").await.unwrap_err();
        assert!(matches!(err, KvTraceError::Fetch(_)));
        assert_eq!(cache.access_count("r").await.unwrap(), 1);
        assert_eq!(store.get(&cache_key("r")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_access_counts_are_per_resource() {
        let store = Arc::new(InMemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        let cache = ExpiringFetchCache::with_defaults(store, &fetcher);

        cache.get_or_fetch("a").await.unwrap();
        cache.get_or_fetch("a").await.unwrap();
        cache.get_or_fetch("b").await.unwrap();

        assert_eq!(cache.access_count("a").await.unwrap(), 2);
        assert_eq!(cache.access_count("b").await.unwrap(), 1);
        assert_eq!(cache.access_count("never").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_counter_survives_expiry() {
        let store = Arc::new(InMemoryStore::new());
        let fetcher = ScriptedFetcher::new();
        let config = FetchCacheConfig::new().with_ttl(Duration::from_millis(40));
        let cache = ExpiringFetchCache::new(store, &fetcher, config);

        cache.get_or_fetch("r").await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        cache.get_or_fetch("r").await.unwrap();
        cache.get_or_fetch("r").await.unwrap();

        // Misses never reset the counter.
        assert_eq!(cache.access_count("r").await.unwrap(), 3);
    }

    #[test]
    fn test_fetch_cache_config_builder() {
        let config = FetchCacheConfig::new().with_ttl(Duration::from_secs(30));
        assert_eq!(config.ttl, Duration::from_secs(30));
        assert_eq!(FetchCacheConfig::default().ttl, Duration::from_secs(10));
    }
}
