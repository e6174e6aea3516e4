//! In-memory key/value store backend.
//!
//! A `RwLock<HashMap>`-backed implementation of [`KeyValueStore`], suitable
//! for tests and single-process use. Expiry is enforced lazily: an entry
//! past its deadline reads as absent but stays in the map until the next
//! overwrite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kvtrace_core::{KvTraceError, KvTraceResult, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::store::KeyValueStore;

/// A scalar entry: raw bytes plus an optional expiry deadline.
#[derive(Debug, Clone)]
struct ValueEntry {
    bytes: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

impl ValueEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// In-memory [`KeyValueStore`] implementation.
///
/// Atomicity of `incr` and `append` comes from holding the write lock
/// across the whole read-modify-write; there is no finer-grained locking.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, ValueEntry>>,
    lists: RwLock<HashMap<String, Vec<Vec<u8>>>>,
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> KvTraceError {
    StoreError::LockPoisoned.into()
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>) -> KvTraceResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(
            key.to_string(),
            ValueEntry {
                bytes: value,
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> KvTraceResult<Option<Vec<u8>>> {
        let values = self.values.read().map_err(poisoned)?;
        let now = Utc::now();
        Ok(values
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.bytes.clone()))
    }

    async fn incr(&self, key: &str) -> KvTraceResult<i64> {
        let mut values = self.values.write().map_err(poisoned)?;
        let now = Utc::now();

        // Expired counters restart from zero, same as missing ones.
        let current = match values.get(key).filter(|entry| !entry.is_expired(now)) {
            Some(entry) => {
                let text =
                    std::str::from_utf8(&entry.bytes).map_err(|e| StoreError::NotAnInteger {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })?;
                text.parse::<i64>().map_err(|e| StoreError::NotAnInteger {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?
            }
            None => 0,
        };

        let next = current + 1;
        values.insert(
            key.to_string(),
            ValueEntry {
                bytes: next.to_string().into_bytes(),
                expires_at: None,
            },
        );
        Ok(next)
    }

    async fn append(&self, list_key: &str, value: Vec<u8>) -> KvTraceResult<()> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        lists.entry(list_key.to_string()).or_default().push(value);
        Ok(())
    }

    async fn range(&self, list_key: &str, start: i64, end: i64) -> KvTraceResult<Vec<Vec<u8>>> {
        let lists = self.lists.read().map_err(poisoned)?;
        let Some(list) = lists.get(list_key) else {
            return Ok(Vec::new());
        };

        let len = list.len() as i64;
        // LRANGE semantics: inclusive bounds, negative indices from the end,
        // out-of-range bounds clamped.
        let start = if start < 0 { (len + start).max(0) } else { start };
        let end = if end < 0 { len + end } else { end.min(len - 1) };

        if len == 0 || start > end || start >= len || end < 0 {
            return Ok(Vec::new());
        }
        Ok(list[start as usize..=end as usize].to_vec())
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> KvTraceResult<()> {
        let deadline = Utc::now()
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::MAX);
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(
            key.to_string(),
            ValueEntry {
                bytes: value,
                expires_at: Some(deadline),
            },
        );
        Ok(())
    }

    async fn clear_all(&self) -> KvTraceResult<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        let mut lists = self.lists.write().map_err(poisoned)?;
        debug!(
            values = values.len(),
            lists = lists.len(),
            "clearing in-memory store"
        );
        values.clear();
        lists.clear();
        Ok(())
    }
}
