//! Replay of recorded invocation histories.

use kvtrace_core::{decode_utf8, KvTraceResult, OpIdentity};
use std::sync::Arc;

use crate::store::KeyValueStore;
use crate::trace::counter::counter_value;

/// One recorded call: the serialized argument tuple and the serialized
/// return value, as JSON strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub input: String,
    pub output: String,
}

/// An ordered trace of past invocations of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTrace {
    /// The operation the trace belongs to.
    pub identity: OpIdentity,
    /// Counter value at read time. Counts attempts, so it may exceed
    /// `calls.len()` when calls failed or are still in flight.
    pub times_called: i64,
    /// Completed input/output pairs, in invocation order.
    pub calls: Vec<RecordedCall>,
}

/// Reads an operation's logs and counter and reconstructs its call trace.
///
/// Pure read: replay has no side effects and is safe to run at any time,
/// including against an identity that was never called (empty trace,
/// count 0). Pairing is index-wise up to the shorter log, which guards the
/// case of inputs logged for calls that never completed.
pub struct ReplayEngine<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> ReplayEngine<S> {
    /// Create a replay engine over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reconstruct the ordered trace of calls recorded under `identity`.
    pub async fn replay(&self, identity: &OpIdentity) -> KvTraceResult<CallTrace> {
        let times_called = counter_value(self.store.as_ref(), identity).await?;
        let inputs = self.store.range(&identity.inputs_key(), 0, -1).await?;
        let outputs = self.store.range(&identity.outputs_key(), 0, -1).await?;

        let calls = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(input, output)| {
                Ok(RecordedCall {
                    input: decode_utf8(input)?,
                    output: decode_utf8(output)?,
                })
            })
            .collect::<KvTraceResult<Vec<_>>>()?;

        Ok(CallTrace {
            identity: identity.clone(),
            times_called,
            calls,
        })
    }
}
