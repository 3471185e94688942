//! Common result and error types for the generator.

/// The result type for operations that can only fail because of a bug.
///
/// Problems in the input IR never produce `Err`: they are reported through a
/// `DiagnosticSink` and generation continues with a degraded fragment.
pub type ZsvResult<T> = Result<T, InternalError>;

/// An internal error indicating a bug in the generator, not an IR problem.
#[derive(Debug, thiserror::Error)]
#[error("internal generator error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<std::fmt::Error> for InternalError {
    fn from(_: std::fmt::Error) -> Self {
        Self::new("formatting into an in-memory buffer failed")
    }
}
