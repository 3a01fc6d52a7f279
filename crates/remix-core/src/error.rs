//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every variant is a local decision: nothing here is retried, and the
/// session remains usable after any of them is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The command is not legal in the current session status.
    #[error("cannot {attempted} while session is {from}")]
    InvalidTransition {
        /// The status the session was in.
        from: &'static str,
        /// The command that was attempted.
        attempted: &'static str,
    },

    /// Empty or malformed input, or a reference to something not on the roster.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup on an unknown team or key.
    #[error("not found: {0}")]
    NotFound(String),

    /// A round index outside the session's bounds.
    #[error("round out of range: {0}")]
    OutOfRange(String),

    /// The session task is no longer accepting commands.
    #[error("session unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidTransition`].
    #[must_use]
    pub fn invalid_transition(from: &'static str, attempted: &'static str) -> Self {
        Self::InvalidTransition { from, attempted }
    }
}
