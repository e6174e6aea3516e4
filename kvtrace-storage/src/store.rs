//! Key/value store trait for pluggable backends.
//!
//! This is the seam the whole crate builds on: the instrumentation wrappers
//! and the expiring fetch cache only ever talk to a [`KeyValueStore`], so a
//! Redis-backed implementation plugs in without touching them. The in-memory
//! implementation lives in [`crate::memory`].

use async_trait::async_trait;
use kvtrace_core::KvTraceResult;
use std::time::Duration;

/// Atomic key/value primitives consumed by the instrumentation layer.
///
/// # Atomicity
///
/// `incr` and `append` MUST be atomic across concurrent callers: a lost
/// counter update or a torn list entry is a correctness violation in the
/// backend, not something the callers re-check. `set`/`get` need only be
/// individually consistent.
///
/// # Absence
///
/// A missing key is never an error. `get` returns `None`, `range` on a
/// missing list returns an empty vector, and `incr` treats a missing key
/// as zero.
///
/// # Expiry
///
/// Entries written with `set_with_ttl` must read as absent once the TTL
/// has elapsed, whether or not the backend physically purged them.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Set `key` to the given bytes, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> KvTraceResult<()>;

    /// Get the bytes at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> KvTraceResult<Option<Vec<u8>>>;

    /// Atomically increment the integer at `key` by one and return the new
    /// value.
    ///
    /// A missing key counts as 0, so the first increment yields 1. The
    /// stored representation is an ASCII decimal, readable back through
    /// `get`. Incrementing a key holding non-numeric bytes fails with
    /// [`StoreError::NotAnInteger`](kvtrace_core::StoreError::NotAnInteger).
    async fn incr(&self, key: &str) -> KvTraceResult<i64>;

    /// Atomically append an entry to the ordered list at `list_key`,
    /// creating the list if absent.
    async fn append(&self, list_key: &str, value: Vec<u8>) -> KvTraceResult<()>;

    /// Read entries `start..=end` of the ordered list at `list_key`.
    ///
    /// Inclusive bounds; negative indices count from the end of the list
    /// (`-1` is the last entry). Out-of-range bounds are clamped and an
    /// empty or missing list yields an empty vector.
    async fn range(&self, list_key: &str, start: i64, end: i64) -> KvTraceResult<Vec<Vec<u8>>>;

    /// Set `key` to the given bytes with a time-to-live. After `ttl`
    /// elapses the entry reads as absent.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> KvTraceResult<()>;

    /// Remove every key and list from the store.
    async fn clear_all(&self) -> KvTraceResult<()>;
}
