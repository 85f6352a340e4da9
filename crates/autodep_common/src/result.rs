//! The internal error type for the autodep engine.

/// An internal error indicating a broken invariant, not a user input problem.
///
/// Configuration mistakes are reported through each crate's own error enum.
/// An `InternalError` means the build graph reached a state the engine should
/// never produce, such as a scheduler pass that can make no progress.
#[derive(Debug, thiserror::Error)]
#[error("internal build error: {message}")]
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
