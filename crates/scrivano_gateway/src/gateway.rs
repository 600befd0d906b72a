//! The failover-rotating call gateway.

use crate::{PacingGate, Provider};
use scrivano_core::{ProviderRequest, ProviderResponse};
use scrivano_error::{
    GatewayError, GatewayErrorKind, GeminiError, GeminiErrorKind, ScrivanoResult,
    extract_provider_message,
};
use scrivano_keys::KeyRing;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Serializes outbound calls through the pacing gate and rotates
/// credentials on failure.
///
/// Holds the key ring behind a mutex so the sticky cursor survives across
/// concurrent callers; the critical sections never span an await point.
pub struct Gateway<P> {
    provider: P,
    ring: Mutex<KeyRing>,
    gate: PacingGate,
}

impl<P> std::fmt::Debug for Gateway<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = self.ring.lock().map(|r| r.len()).unwrap_or(0);
        f.debug_struct("Gateway")
            .field("keys", &keys)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl<P: Provider> Gateway<P> {
    /// Creates a gateway over `provider` with the given ring and gate.
    pub fn new(provider: P, ring: KeyRing, gate: PacingGate) -> Self {
        Self {
            provider,
            ring: Mutex::new(ring),
            gate,
        }
    }

    /// Get a reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs `f` against the key ring.
    ///
    /// Exposed for key management by the UI collaborator (add/remove/list);
    /// the failover loop itself goes through [`Gateway::invoke`].
    pub fn with_ring<R>(&self, f: impl FnOnce(&mut KeyRing) -> R) -> R {
        let mut ring = self.ring.lock().unwrap();
        f(&mut ring)
    }

    /// Issues one logical call, rotating through every credential before
    /// giving up.
    ///
    /// Starting at the ring's current index, each key is attempted at most
    /// once. A success pins the ring to the key that worked and returns;
    /// a failure is recorded, the cursor advances with wrap-around, and the
    /// next key is tried after the pacing gate clears. When every key has
    /// failed the call errors with `AllCredentialsFailed`, carrying the
    /// last underlying message.
    ///
    /// # Errors
    ///
    /// - `NoCredentials` when the ring is empty.
    /// - `AllCredentialsFailed` when every key was rejected.
    #[instrument(skip(self, request), fields(parts = request.parts.len()))]
    pub async fn invoke(&self, request: &ProviderRequest) -> ScrivanoResult<ProviderResponse> {
        let (start, len) = {
            let ring = self.ring.lock().unwrap();
            if ring.is_empty() {
                return Err(GatewayError::new(GatewayErrorKind::NoCredentials).into());
            }
            (ring.current_index(), ring.len())
        };

        let mut last_failure = String::new();

        for attempt in 0..len {
            let index = (start + attempt) % len;
            let key = {
                let ring = self.ring.lock().unwrap();
                ring.key_at(index).map(str::to_string)
            };
            // The ring can shrink between attempts if the UI removes a key
            // mid-call; a vanished slot just counts as a failed attempt.
            let Some(key) = key else {
                self.ring.lock().unwrap().advance();
                continue;
            };

            self.gate.acquire().await;

            match self.provider.call(&key, request).await {
                Ok(response) => {
                    debug!(index, attempt, "Call succeeded, pinning credential");
                    self.ring.lock().unwrap().remember(index);
                    return Ok(response);
                }
                Err(e) => {
                    let message = failure_message(&e);
                    let rejected = GatewayError::new(GatewayErrorKind::CredentialRejected {
                        index,
                        message: message.clone(),
                    });
                    warn!(index, attempt, error = %rejected, "Rotating to next credential");
                    last_failure = message;
                    self.ring.lock().unwrap().advance();
                }
            }
        }

        Err(GatewayError::all_failed(last_failure).into())
    }
}

/// Distills a provider error into the message recorded per attempt and
/// carried by the terminal `AllCredentialsFailed`.
///
/// HTTP failures carry the raw response body, which is often a structured
/// `{"error":{"message":...}}` payload worth unwrapping.
fn failure_message(err: &GeminiError) -> String {
    match &err.kind {
        GeminiErrorKind::HttpStatus { message, .. } => extract_provider_message(message),
        GeminiErrorKind::ApiRequest(message)
        | GeminiErrorKind::Blocked(message)
        | GeminiErrorKind::Decode(message) => extract_provider_message(message),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_unwraps_http_body() {
        let err = GeminiError::new(GeminiErrorKind::HttpStatus {
            status_code: 429,
            message: r#"{"error":{"message":"quota exceeded"}}"#.to_string(),
        });
        assert_eq!(failure_message(&err), "quota exceeded");
    }

    #[test]
    fn failure_message_passes_plain_kinds_through() {
        let err = GeminiError::new(GeminiErrorKind::EmptyCandidates);
        assert_eq!(failure_message(&err), "Response contained no candidates");
    }
}
