//! Common result and error types for the quarry toolchain.

/// The standard result type for operations that can only fail on a bug.
///
/// `Err` indicates a broken internal invariant (an incrementally maintained
/// energy drifting from its full recomputation, a grid cell claimed twice),
/// never a problem with the user's board or netlist. Input problems are
/// reported through the placer's own error type and the diagnostic sink.
pub type QuarryResult<T> = Result<T, InternalError>;

/// An internal consistency failure indicating a bug in quarry, not an input problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("internal consistency failure: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
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
