//! Remix relay — HTTP transport for a single relay session.
//!
//! Requests are translated into session commands and queries and handed to
//! the session task through its [`remix_session::application::handle::SessionHandle`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
