//! Generation client error types.

/// Specific error conditions for typed generation operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ClientErrorKind {
    /// A structured (schema-constrained) call returned an unparseable shape
    #[display("Malformed structured response: {}", _0)]
    MalformedResponse(String),
    /// An image-generation call returned no image payload
    #[display("No image returned by provider")]
    NoImageReturned,
}

/// Generation client error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivano_error::{ClientError, ClientErrorKind};
///
/// let err = ClientError::new(ClientErrorKind::NoImageReturned);
/// assert!(format!("{}", err).contains("No image"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Client Error: {} at line {} in {}", kind, line, file)]
pub struct ClientError {
    /// The kind of error that occurred
    pub kind: ClientErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
