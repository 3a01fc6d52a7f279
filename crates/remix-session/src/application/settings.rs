//! Session settings.

use std::time::Duration;

use remix_core::error::DomainError;
use serde::{Deserialize, Serialize};

use crate::domain::round::RoundStateMachine;

/// Rounds per session when not configured.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 4;

/// Round length in seconds when not configured (ten minutes).
pub const DEFAULT_TIME_PER_ROUND: u32 = 10 * 60;

/// Real time between two countdown ticks when not configured.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Settings a session is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Number of rounds.
    pub total_rounds: u32,
    /// Round length in seconds.
    pub time_per_round: u32,
    /// Real time between two countdown ticks. One second in production;
    /// shorter in demos.
    pub tick_period: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            time_per_round: DEFAULT_TIME_PER_ROUND,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

impl SessionSettings {
    /// Builds the initial round state machine.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for zero rounds, a zero round
    /// length or a zero tick period.
    pub fn state_machine(&self) -> Result<RoundStateMachine, DomainError> {
        if self.tick_period.is_zero() {
            return Err(DomainError::InvalidArgument(
                "tick period must be greater than zero".to_owned(),
            ));
        }
        RoundStateMachine::new(self.total_rounds, self.time_per_round)
    }
}
