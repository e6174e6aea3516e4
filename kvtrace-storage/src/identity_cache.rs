//! Random-key value cache.
//!
//! [`IdentityCache`] assigns a fresh random key to every value placed into
//! the store and retrieves values by key, optionally through a decoder.
//! Keys are UUIDv4 strings; collisions are treated as impossible and no
//! uniqueness check is performed against existing keys.

use async_trait::async_trait;
use kvtrace_core::{decode_i64, decode_utf8, DecodeError, KvTraceResult};
use std::sync::Arc;
use uuid::Uuid;

use crate::store::KeyValueStore;
use crate::trace::Operation;

/// Value cache that names stored values with random keys.
///
/// Values are opaque byte sequences; the cache never interprets them on
/// the way in. On the way out, callers may supply a decoder to get a typed
/// view. A missing key always surfaces as `Ok(None)` before any decoder
/// runs, so absence and decode failure stay distinguishable.
pub struct IdentityCache<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> IdentityCache<S> {
    /// Create a new cache over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store_handle(&self) -> &Arc<S> {
        &self.store
    }

    /// Store a value under a freshly generated random key and return the
    /// key.
    pub async fn store(&self, value: Vec<u8>) -> KvTraceResult<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, value).await?;
        Ok(key)
    }

    /// Get the raw bytes at `key`, or `None` if absent.
    pub async fn get(&self, key: &str) -> KvTraceResult<Option<Vec<u8>>> {
        self.store.get(key).await
    }

    /// Get the value at `key` through a decoder.
    ///
    /// Returns `Ok(None)` when the key is absent; the decoder is never run
    /// in that case. A decoder failure is an error, not absence.
    pub async fn get_with<T>(
        &self,
        key: &str,
        decode: impl Fn(&[u8]) -> Result<T, DecodeError> + Send,
    ) -> KvTraceResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(decode(&raw)?)),
            None => Ok(None),
        }
    }

    /// Get the value at `key` as UTF-8 text.
    pub async fn get_text(&self, key: &str) -> KvTraceResult<Option<String>> {
        self.get_with(key, decode_utf8).await
    }

    /// Get the value at `key` as a signed integer.
    pub async fn get_i64(&self, key: &str) -> KvTraceResult<Option<i64>> {
        self.get_with(key, decode_i64).await
    }

    /// Expose `store` as an [`Operation`] so it can be wrapped by the
    /// instrumentation chain.
    pub fn store_op(&self) -> StoreOperation<S> {
        StoreOperation {
            cache: self.clone(),
        }
    }
}

impl<S: KeyValueStore> Clone for IdentityCache<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// [`IdentityCache::store`] as a wrappable operation: bytes in, key out.
pub struct StoreOperation<S: KeyValueStore> {
    cache: IdentityCache<S>,
}

#[async_trait]
impl<S: KeyValueStore> Operation<Vec<u8>, String> for StoreOperation<S> {
    async fn call(&self, input: Vec<u8>) -> KvTraceResult<String> {
        self.cache.store(input).await
    }
}
