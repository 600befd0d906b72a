//! The upstream provider seam.

use async_trait::async_trait;
use scrivano_core::{ProviderRequest, ProviderResponse};
use scrivano_error::GeminiError;

/// A black-box request/response call against the upstream provider.
///
/// Implementations must force evaluation of the result payload before
/// returning `Ok`: a response that is well-formed at the transport level
/// but carries a provider-side safety or error payload is a failure, never
/// a success. The gateway's failover contract depends on this; silently
/// returning a blocked response would pin the ring to a key that did not
/// actually work.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Issue one call with the given API key.
    async fn call(
        &self,
        api_key: &str,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, GeminiError>;
}
