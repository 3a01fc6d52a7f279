//! Remix relay — session orchestration engine.
//!
//! Runs a timed, multi-round session in which teams hand their work to the
//! next team in a ring each round. The domain layer holds the round state
//! machine, the submission ledger, the roster and the rotation rule; the
//! application layer serializes every command and clock tick through a single
//! session task.

pub mod application;
pub mod domain;
