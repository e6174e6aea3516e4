//! Invocation counting wrapper.

use async_trait::async_trait;
use kvtrace_core::{KvTraceResult, OpIdentity};
use std::sync::Arc;
use tracing::trace;

use crate::store::KeyValueStore;
use crate::trace::Operation;

/// Wraps an operation so every call atomically bumps a per-identity
/// counter in the store.
///
/// The increment happens BEFORE the inner operation runs: the counter
/// counts attempts, not completions. If the inner operation fails, the
/// increment stays in place and the error propagates unchanged, so a
/// reader may observe a count ahead of the completed outputs.
pub struct InvocationCounter<S: KeyValueStore, Op> {
    store: Arc<S>,
    identity: OpIdentity,
    inner: Op,
}

impl<S: KeyValueStore, Op> InvocationCounter<S, Op> {
    /// Wrap `inner` so calls are counted under `identity`.
    pub fn new(inner: Op, store: Arc<S>, identity: OpIdentity) -> Self {
        Self {
            store,
            identity,
            inner,
        }
    }

    /// The identity this counter is keyed by.
    pub fn identity(&self) -> &OpIdentity {
        &self.identity
    }

    /// Read the current counter value (0 when the operation was never
    /// called).
    pub async fn count(&self) -> KvTraceResult<i64> {
        counter_value(self.store.as_ref(), &self.identity).await
    }
}

/// Read the invocation counter for `identity` directly from a store.
pub(crate) async fn counter_value<S: KeyValueStore>(
    store: &S,
    identity: &OpIdentity,
) -> KvTraceResult<i64> {
    match store.get(&identity.counter_key()).await? {
        Some(raw) => Ok(kvtrace_core::decode_i64(&raw)?),
        None => Ok(0),
    }
}

#[async_trait]
impl<S, Op, I, O> Operation<I, O> for InvocationCounter<S, Op>
where
    S: KeyValueStore,
    Op: Operation<I, O>,
    I: Send + 'static,
    O: Send + 'static,
{
    async fn call(&self, input: I) -> KvTraceResult<O> {
        let attempt = self.store.incr(&self.identity.counter_key()).await?;
        trace!(identity = %self.identity, attempt, "counted invocation");
        self.inner.call(input).await
    }
}
