//! Operation identities and the store key namespace.
//!
//! Every wrapped operation is named by an explicit [`OpIdentity`] supplied
//! at wrapping time. The identity is the namespace root for that
//! operation's counter and history logs, so two differently named
//! operations can never share instrumentation state, and the same identity
//! re-used across process restarts accumulates against the same keys.
//!
//! Identities are never derived from runtime reflection; the caller
//! assembling the system decides the names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable name for a wrapped operation.
///
/// Rendered as `scope.name` (e.g. `math.add`, `cache.store`). The rendered
/// form is embedded in store keys, so it must be stable for as long as the
/// operation's history is expected to survive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpIdentity {
    scope: String,
    name: String,
}

impl OpIdentity {
    /// Create a new operation identity from a qualifying scope and a name.
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
        }
    }

    /// The qualifying scope (module, type, or subsystem name).
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The operation name within its scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store key for this operation's invocation counter.
    pub fn counter_key(&self) -> String {
        format!("count:{}", self)
    }

    /// Store key for this operation's ordered input log.
    pub fn inputs_key(&self) -> String {
        format!("inputs:{}", self)
    }

    /// Store key for this operation's ordered output log.
    pub fn outputs_key(&self) -> String {
        format!("outputs:{}", self)
    }
}

impl fmt::Display for OpIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope, self.name)
    }
}

/// Store key for a resource's cached content.
pub fn cache_key(resource: &str) -> String {
    format!("cache:{resource}")
}

/// Store key for a resource's access counter.
pub fn access_key(resource: &str) -> String {
    format!("count:{resource}")
}
