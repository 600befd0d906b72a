//! Access-layer error types and failover diagnostics.

/// Specific error conditions for the access layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GatewayErrorKind {
    /// The credential store is empty
    #[display("No API credentials configured")]
    NoCredentials,
    /// A single credential's call failed; recorded per attempt, surfaced
    /// only when every credential has been exhausted
    #[display("Credential {} rejected: {}", index, message)]
    CredentialRejected {
        /// Position of the credential in the ring
        index: usize,
        /// Underlying failure message
        message: String,
    },
    /// Every credential in the ring failed for this call
    #[display("All API credentials failed; last error: {}", _0)]
    AllCredentialsFailed(String),
}

/// Access-layer error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivano_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::NoCredentials);
/// assert!(format!("{}", err).contains("No API credentials"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Build the terminal failover error from the last underlying message.
    ///
    /// Runs the message through [`extract_provider_message`] so callers see
    /// the provider's own description instead of a JSON blob when possible.
    #[track_caller]
    pub fn all_failed(last_message: impl AsRef<str>) -> Self {
        Self::new(GatewayErrorKind::AllCredentialsFailed(
            extract_provider_message(last_message.as_ref()),
        ))
    }
}

/// Best-effort extraction of a nested provider error message.
///
/// Provider failures often embed a structured payload shaped like
/// `{"error":{"message":"..."}}` inside the error string. When the input
/// parses that way the inner message is returned; otherwise the input is
/// passed through unchanged.
///
/// # Examples
///
/// ```
/// use scrivano_error::extract_provider_message;
///
/// let raw = r#"{"error":{"message":"quota exceeded","code":429}}"#;
/// assert_eq!(extract_provider_message(raw), "quota exceeded");
/// assert_eq!(extract_provider_message("plain failure"), "plain failure");
/// ```
pub fn extract_provider_message(raw: &str) -> String {
    serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_message() {
        let raw = r#"{"error":{"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_provider_message(raw), "API key not valid");
    }

    #[test]
    fn passes_through_plain_text() {
        assert_eq!(extract_provider_message("connection reset"), "connection reset");
    }

    #[test]
    fn passes_through_unrelated_json() {
        let raw = r#"{"status":"oops"}"#;
        assert_eq!(extract_provider_message(raw), raw);
    }

    #[test]
    fn all_failed_unwraps_payload() {
        let err = GatewayError::all_failed(r#"{"error":{"message":"quota exceeded"}}"#);
        assert_eq!(
            err.kind,
            GatewayErrorKind::AllCredentialsFailed("quota exceeded".to_string())
        );
    }
}
