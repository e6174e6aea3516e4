//! The external fetch collaborator trait.

use async_trait::async_trait;
use kvtrace_core::FetchError;

/// Retrieves the content of an external resource by identifier.
///
/// This is the seam where a real transport (an HTTP client, for instance)
/// plugs into [`ExpiringFetchCache`](crate::cache::ExpiringFetchCache).
/// Calls may block on I/O; the cache passes that latency through and
/// imposes no timeout of its own. Transport failures surface as
/// [`FetchError::Upstream`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the content of `resource`.
    async fn fetch(&self, resource: &str) -> Result<String, FetchError>;
}
