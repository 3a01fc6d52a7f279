//! Remix Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the session engine and its
//! adapters share. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod event;
