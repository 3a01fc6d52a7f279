//! Shared application state.

use remix_session::application::handle::SessionHandle;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the hosted session task.
    pub session: SessionHandle,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }
}
