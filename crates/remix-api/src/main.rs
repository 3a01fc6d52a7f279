//! Remix relay API server entry point.

use std::sync::Arc;

use remix_api::config::AppConfig;
use remix_api::error::AppError;
use remix_api::routes;
use remix_api::state::AppState;
use remix_core::clock::SystemClock;
use remix_session::application::handle::spawn_session;
use remix_session::domain::roster::Roster;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting remix relay API server");

    let config = AppConfig::from_env()?;
    let addr = config.socket_addr()?;

    // The roster starts empty; teams are registered over the API.
    let session = spawn_session(
        Uuid::now_v7(),
        &config.session,
        Roster::new(),
        Arc::new(SystemClock),
    )
    .map_err(|e| AppError::Config(e.to_string()))?;
    tracing::info!(
        session_id = %session.id(),
        total_rounds = config.session.total_rounds,
        time_per_round = config.session.time_per_round,
        "session ready"
    );

    let app_state = AppState::new(session.clone());

    // TODO: Replace CorsLayer::permissive() with the facilitator and participant origins.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
