//! Application layer: the session task and its handle.
//!
//! All commands, queries and clock ticks for one session are funnelled
//! through a single task, so state transitions never interleave.

pub mod clock;
pub mod command_handlers;
pub mod handle;
pub mod query_handlers;
mod runner;
pub mod settings;
