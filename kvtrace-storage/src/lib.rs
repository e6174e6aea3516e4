//! kvtrace Storage - Store Abstraction and Instrumentation
//!
//! The [`KeyValueStore`] trait is the seam to the underlying store;
//! [`InMemoryStore`] is the bundled backend. On top of it sit the
//! [`IdentityCache`] (random-key value storage), the `trace` module
//! (invocation counting, history, replay), and the `cache` module
//! (TTL-bound memoization of an external fetch operation).
//!
//! Store handles are constructed explicitly and passed to each component;
//! there is no process-wide client.

pub mod cache;
pub mod identity_cache;
pub mod memory;
pub mod store;
pub mod trace;

pub use cache::{ExpiringFetchCache, FetchCacheConfig, Fetcher};
pub use identity_cache::{IdentityCache, StoreOperation};
pub use memory::InMemoryStore;
pub use store::KeyValueStore;
pub use trace::{
    instrument, CallTrace, InvocationCounter, InvocationHistory, Operation, RecordedCall,
    ReplayEngine,
};
