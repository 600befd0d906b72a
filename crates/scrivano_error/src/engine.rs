//! Job engine error types.

/// Message stored on jobs aborted by a user-issued stop.
pub const STOPPED_BY_USER: &str = "stopped by user";

/// Specific error conditions for the job engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum EngineErrorKind {
    /// The outline response parsed to zero chapters
    #[display("Outline response produced no chapters")]
    EmptyOutline,
    /// The job was aborted by a user-issued stop
    #[display("{}", STOPPED_BY_USER)]
    StoppedByUser,
    /// Batch responses under-delivered; some chapters are still empty
    #[display("{} chapters still empty after generation", _0)]
    ChaptersMissing(usize),
    /// No job exists with the given id
    #[display("No job with id {}", _0)]
    JobNotFound(String),
    /// A control request does not apply to the job's current status
    #[display("Job {} is not in a retryable state", _0)]
    NotRetryable(String),
}

/// Job engine error with source location tracking.
///
/// # Examples
///
/// ```
/// use scrivano_error::{EngineError, EngineErrorKind};
///
/// let err = EngineError::new(EngineErrorKind::StoppedByUser);
/// assert_eq!(format!("{}", err.kind), "stopped by user");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Engine Error: {} at line {} in {}", kind, line, file)]
pub struct EngineError {
    /// The kind of error that occurred
    pub kind: EngineErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl EngineError {
    /// Create a new EngineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EngineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
