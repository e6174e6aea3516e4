//! The wrappable operation contract.

use async_trait::async_trait;
use kvtrace_core::KvTraceResult;

/// An invocable operation with input `I` and output `O`.
///
/// Instrumentation wrappers implement this same trait and hold the next
/// operation in the chain, so wrapping never changes the calling contract:
/// a wrapped operation is called exactly like the bare one and returns its
/// result unchanged. Chains are assembled at construction time.
#[async_trait]
pub trait Operation<I, O>: Send + Sync
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Invoke the operation.
    async fn call(&self, input: I) -> KvTraceResult<O>;
}
