//! Route modules and the assembled application router.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod session;

/// Builds the full application router. Shared by the binary and the tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/session", session::router())
        .with_state(state)
}
