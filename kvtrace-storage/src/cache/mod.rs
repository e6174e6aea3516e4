//! Expiring fetch cache.
//!
//! Memoizes an external resource-retrieval operation behind the
//! [`KeyValueStore`](crate::store::KeyValueStore) abstraction: content is
//! cached with a TTL, and every access (hit or miss) bumps a per-resource
//! counter. The fetch transport itself lives behind the [`Fetcher`] seam.

pub mod expiring;
pub mod fetcher;

pub use expiring::{ExpiringFetchCache, FetchCacheConfig};
pub use fetcher::Fetcher;
