//! kvtrace Core - Errors, Identities, Decode Contracts
//!
//! Pure types with no I/O. The storage and instrumentation crates depend on
//! this; nothing here touches a store.

pub mod error;
pub mod identity;
pub mod value;

pub use error::{
    DecodeError, FetchError, KvTraceError, KvTraceResult, StoreError, TraceError,
};
pub use identity::{access_key, cache_key, OpIdentity};
pub use value::{decode_i64, decode_utf8};
