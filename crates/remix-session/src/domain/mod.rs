//! Domain model for relay sessions.

pub mod aggregates;
pub mod challenge;
pub mod commands;
pub mod events;
pub mod ledger;
pub mod roster;
pub mod rotation;
pub mod round;
