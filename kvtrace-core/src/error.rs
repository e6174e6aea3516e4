//! Error types for kvtrace operations

use thiserror::Error;

/// Key/value store layer errors.
///
/// Absence of a key is NOT an error anywhere in this crate: reads return
/// `Ok(None)` for missing keys. These variants cover the store itself
/// misbehaving or being handed a value it cannot operate on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("atomic increment on {key} failed, value is not an integer: {reason}")]
    NotAnInteger { key: String, reason: String },
}

/// Value decode errors.
///
/// Distinct from absence: a missing key surfaces as `Ok(None)` and a
/// decoder is never run against it. These variants fire only when a key
/// exists but its bytes cannot be converted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("value is not valid UTF-8: {reason}")]
    InvalidUtf8 { reason: String },

    #[error("value is not an integer literal: {reason}")]
    MalformedInteger { reason: String },

    #[error("decode failed: {reason}")]
    DecodeFailed { reason: String },
}

/// Upstream fetch collaborator errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream fetch for {resource} failed: {reason}")]
    Upstream { resource: String, reason: String },
}

/// Instrumentation layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TraceError {
    #[error("failed to serialize invocation record for {identity}: {reason}")]
    RecordSerialization { identity: String, reason: String },
}

/// Master error type for all kvtrace errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KvTraceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("trace error: {0}")]
    Trace(#[from] TraceError),
}

/// Result type alias for kvtrace operations.
pub type KvTraceResult<T> = Result<T, KvTraceError>;

// =============================================================================
// TESTS
// =============================================================================
