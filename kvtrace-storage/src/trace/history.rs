//! Invocation history wrapper.

use async_trait::async_trait;
use kvtrace_core::{KvTraceError, KvTraceResult, OpIdentity, TraceError};
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

use crate::store::KeyValueStore;
use crate::trace::Operation;

/// Wraps an operation so every call appends its serialized input and
/// output to two parallel ordered logs keyed by the operation's identity.
///
/// The input is appended before the inner operation runs; the output is
/// appended only after it returns successfully. On failure the input entry
/// stays in place with no matching output, so the input log may run ahead
/// of the output log. Readers pair entries index-wise up to the shorter
/// length and treat the tail as in-flight or failed calls.
///
/// The append/call/append sequence is not atomic as a whole: under
/// concurrent calls to the same identity, input order and output order may
/// interleave differently. Index pairing is guaranteed only under a
/// non-concurrent calling discipline per identity.
pub struct InvocationHistory<S: KeyValueStore, Op> {
    store: Arc<S>,
    identity: OpIdentity,
    inner: Op,
}

impl<S: KeyValueStore, Op> InvocationHistory<S, Op> {
    /// Wrap `inner` so calls are logged under `identity`.
    pub fn new(inner: Op, store: Arc<S>, identity: OpIdentity) -> Self {
        Self {
            store,
            identity,
            inner,
        }
    }

    /// The identity this history is keyed by.
    pub fn identity(&self) -> &OpIdentity {
        &self.identity
    }

    fn serialize_record<T: Serialize>(&self, record: &T) -> KvTraceResult<Vec<u8>> {
        serde_json::to_vec(record).map_err(|e| {
            KvTraceError::Trace(TraceError::RecordSerialization {
                identity: self.identity.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[async_trait]
impl<S, Op, I, O> Operation<I, O> for InvocationHistory<S, Op>
where
    S: KeyValueStore,
    Op: Operation<I, O>,
    I: Serialize + Send + 'static,
    O: Serialize + Send + 'static,
{
    async fn call(&self, input: I) -> KvTraceResult<O> {
        let input_record = self.serialize_record(&input)?;
        self.store
            .append(&self.identity.inputs_key(), input_record)
            .await?;

        let output = self.inner.call(input).await?;

        let output_record = self.serialize_record(&output)?;
        self.store
            .append(&self.identity.outputs_key(), output_record)
            .await?;
        trace!(identity = %self.identity, "recorded invocation pair");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use kvtrace_core::FetchError;

    struct Upper;

    #[async_trait]
    impl Operation<String, String> for Upper {
        async fn call(&self, input: String) -> KvTraceResult<String> {
            Ok(input.to_uppercase())
        }
    }

    struct FailOnOdd;

    #[async_trait]
    impl Operation<i64, i64> for FailOnOdd {
        async fn call(&self, input: i64) -> KvTraceResult<i64> {
            if input % 2 == 1 {
                return Err(FetchError::Upstream {
                    resource: "odd".to_string(),
                    reason: "rejected".to_string(),
                }
                .into());
            }
            Ok(input / 2)
        }
    }

    async fn log_len(store: &InMemoryStore, key: &str) -> usize {
        store.range(key, 0, -1).await.unwrap().len()
    }

    #[tokio::test]
    async fn test_logs_stay_paired_over_sequential_calls() {
        let store = Arc::new(InMemoryStore::new());
        let id = OpIdentity::new("text", "upper");
        let logged = InvocationHistory::new(Upper, Arc::clone(&store), id.clone());

        logged.call("one".to_string()).await.unwrap();
        logged.call("two".to_string()).await.unwrap();
        logged.call("three".to_string()).await.unwrap();

        assert_eq!(log_len(&store, &id.inputs_key()).await, 3);
        assert_eq!(log_len(&store, &id.outputs_key()).await, 3);
    }

    #[tokio::test]
    async fn test_nth_entries_correspond() {
        let store = Arc::new(InMemoryStore::new());
        let id = OpIdentity::new("text", "upper");
        let logged = InvocationHistory::new(Upper, Arc::clone(&store), id.clone());

        logged.call("abc".to_string()).await.unwrap();
        logged.call("xyz".to_string()).await.unwrap();

        let inputs = store.range(&id.inputs_key(), 0, -1).await.unwrap();
        let outputs = store.range(&id.outputs_key(), 0, -1).await.unwrap();
        assert_eq!(inputs[0], b"\"abc\"".to_vec());
        assert_eq!(outputs[0], b"\"ABC\"".to_vec());
        assert_eq!(inputs[1], b"\"xyz\"".to_vec());
        assert_eq!(outputs[1], b"\"XYZ\"".to_vec());
    }

    #[tokio::test]
    async fn test_failure_logs_input_but_not_output() {
        let store = Arc::new(InMemoryStore::new());
        let id = OpIdentity::new("math", "halve");
        let logged = InvocationHistory::new(FailOnOdd, Arc::clone(&store), id.clone());

        logged.call(4).await.unwrap();
        logged.call(3).await.unwrap_err();

        assert_eq!(log_len(&store, &id.inputs_key()).await, 2);
        assert_eq!(log_len(&store, &id.outputs_key()).await, 1);
    }

    #[tokio::test]
    async fn test_return_value_passes_through_unchanged() {
        let store = Arc::new(InMemoryStore::new());
        let logged =
            InvocationHistory::new(Upper, store, OpIdentity::new("text", "upper"));
        assert_eq!(logged.call("hi".to_string()).await.unwrap(), "HI");
    }
}
