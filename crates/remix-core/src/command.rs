//! Command abstractions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a command entered the system.
///
/// Facilitator commands come from whoever drives the session (start, pause,
/// round changes). Participant commands are relayed in by the transport layer
/// on behalf of a remote team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOrigin {
    /// Issued by the session facilitator.
    Facilitator,
    /// Relayed from a remote participant.
    Participant,
}

impl fmt::Display for CommandOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Facilitator => f.write_str("facilitator"),
            Self::Participant => f.write_str("participant"),
        }
    }
}

/// Trait that all commands implement.
pub trait Command: Send + Sync + fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// Who issued the command.
    fn origin(&self) -> CommandOrigin {
        CommandOrigin::Facilitator
    }
}

/// Generates a correlation ID for a command entering the system.
///
/// Time-ordered so that IDs sort in arrival order in logs.
#[must_use]
pub fn new_correlation_id() -> Uuid {
    Uuid::now_v7()
}
