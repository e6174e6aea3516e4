//! Invocation instrumentation: counting, history, and replay.
//!
//! Wrappers implement the same [`Operation`] contract as the operations
//! they wrap, so instrumentation composes without changing behavior or
//! return values. Each wrapper holds the next operation in the chain,
//! assembled once at construction time.
//!
//! # Composition order
//!
//! When both the counter and the history wrap the same base operation, the
//! order is history-outer / counter-inner: the counter bumps exactly once
//! per attempt, and the history's input/output pairing stays consistent
//! with the counter's attempt semantics. [`instrument`] builds the chain
//! in that order; assembling it the other way round breaks either the
//! counting or the pairing guarantee.

pub mod counter;
pub mod history;
pub mod op;
pub mod replay;

pub use counter::InvocationCounter;
pub use history::InvocationHistory;
pub use op::Operation;
pub use replay::{CallTrace, RecordedCall, ReplayEngine};

use kvtrace_core::OpIdentity;
use std::sync::Arc;

use crate::store::KeyValueStore;

/// Wrap `op` with the full instrumentation chain under `identity`:
/// history wrapping counter wrapping `op`.
pub fn instrument<S: KeyValueStore, Op>(
    op: Op,
    store: Arc<S>,
    identity: OpIdentity,
) -> InvocationHistory<S, InvocationCounter<S, Op>> {
    let counted = InvocationCounter::new(op, Arc::clone(&store), identity.clone());
    InvocationHistory::new(counted, store, identity)
}
