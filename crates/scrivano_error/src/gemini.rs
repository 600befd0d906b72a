//! Gemini provider error types.

/// Specific error conditions for Gemini API calls.
///
/// A call only counts as successful once the response payload has been
/// evaluated: a well-formed HTTP response that carries a block reason or an
/// empty candidate list is still a failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GeminiErrorKind {
    /// API request failed at the transport layer
    #[display("Gemini API request failed: {}", _0)]
    ApiRequest(String),
    /// HTTP error with status code and response body
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the API
        message: String,
    },
    /// The prompt or response was blocked by provider safety filters
    #[display("Request blocked by provider: {}", _0)]
    Blocked(String),
    /// The response contained no candidates to evaluate
    #[display("Response contained no candidates")]
    EmptyCandidates,
    /// Failed to decode the response body
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
}

/// Gemini error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivano_error::{GeminiError, GeminiErrorKind};
///
/// let err = GeminiError::new(GeminiErrorKind::EmptyCandidates);
/// assert!(format!("{}", err).contains("no candidates"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gemini Error: {} at line {} in {}", kind, line, file)]
pub struct GeminiError {
    /// The kind of error that occurred
    pub kind: GeminiErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GeminiError {
    /// Create a new GeminiError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GeminiErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
