//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use remix_session::application::handle::{SessionHandle, spawn_session};
use remix_session::application::settings::SessionSettings;
use remix_session::domain::roster::{NewTeam, Roster};
use remix_test_support::FixedClock;
use tower::ServiceExt;
use uuid::Uuid;

use remix_api::routes;
use remix_api::state::AppState;

/// Spawn a session with teams A..D, four rounds of `time_per_round` seconds
/// and one tick per second.
pub fn spawn_test_session(time_per_round: u32) -> SessionHandle {
    let roster = Roster::from_teams(
        ["A", "B", "C", "D"].map(|id| NewTeam::new(id, format!("Team {id}"), Vec::new())),
    )
    .unwrap();
    let settings = SessionSettings {
        total_rounds: 4,
        time_per_round,
        tick_period: Duration::from_secs(1),
    };
    spawn_session(
        Uuid::new_v4(),
        &settings,
        roster,
        Arc::new(FixedClock::default()),
    )
    .unwrap()
}

/// Build the full app router around `session`. Uses the same route structure
/// as `main.rs`.
pub fn build_test_app(session: SessionHandle) -> Router {
    routes::app(AppState::new(session))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("POST", uri, body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, json_request("PUT", uri, body)).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("POST", uri)).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("DELETE", uri)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, empty_request("GET", uri)).await
}
