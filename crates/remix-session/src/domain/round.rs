//! Round lifecycle state machine.
//!
//! `Idle → Running → {Paused ⇄ Running} → Ended → Idle (next round)`.
//! The machine owns the round index and the countdown; it never schedules
//! anything itself. Ticks are fed in by the session clock.

use std::fmt;

use remix_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for the round to start.
    Idle,
    /// The countdown is running.
    Running,
    /// Started but paused; ticks are dropped.
    Paused,
    /// The round is over.
    Ended,
}

impl SessionStatus {
    /// Returns the status name used in errors and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of delivering one clock tick to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The round was not running; the tick was dropped.
    Ignored,
    /// One second was counted down.
    Counted {
        /// Seconds left after this tick.
        time_remaining: u32,
    },
    /// The countdown reached zero and the round was ended.
    Exhausted {
        /// The round that ran out of time.
        round: u32,
        /// Whether it was the last round of the session.
        final_round: bool,
    },
}

/// Round index, status and countdown for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStateMachine {
    status: SessionStatus,
    current_round: u32,
    total_rounds: u32,
    time_per_round: u32,
    time_remaining: u32,
}

impl RoundStateMachine {
    /// Creates a machine idle at round 0 with a full timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if either value is zero.
    pub fn new(total_rounds: u32, time_per_round: u32) -> Result<Self, DomainError> {
        validate_total_rounds(total_rounds, 0)?;
        validate_time_per_round(time_per_round)?;
        Ok(Self {
            status: SessionStatus::Idle,
            current_round: 0,
            total_rounds,
            time_per_round,
            time_remaining: time_per_round,
        })
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Zero-based index of the current round.
    #[must_use]
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Number of rounds in the session.
    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Length of each round in seconds.
    #[must_use]
    pub fn time_per_round(&self) -> u32 {
        self.time_per_round
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Whether the current round is the last one.
    #[must_use]
    pub fn is_final_round(&self) -> bool {
        self.current_round + 1 == self.total_rounds
    }

    /// `Idle → Running`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from any other status.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.require(&[SessionStatus::Idle], "start")?;
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// `Running → Paused`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from any other status.
    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.require(&[SessionStatus::Running], "pause")?;
        self.status = SessionStatus::Paused;
        Ok(())
    }

    /// `Paused → Running`.
    ///
    /// The countdown continues from whole seconds: the session clock restarts
    /// a full tick period on resume, so any fraction of a second that had
    /// elapsed before the pause is not credited. Pausing and resuming faster
    /// than the tick period therefore holds the countdown still.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from any other status.
    pub fn resume(&mut self) -> Result<(), DomainError> {
        self.require(&[SessionStatus::Paused], "resume")?;
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// `Running | Paused → Ended`, resetting the timer to a full round.
    ///
    /// The reset discards how much time was actually used before an early
    /// end. Kept as observed; see DESIGN.md.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from `Idle` or `Ended`.
    pub fn end(&mut self) -> Result<(), DomainError> {
        self.require(&[SessionStatus::Running, SessionStatus::Paused], "end")?;
        self.finish();
        Ok(())
    }

    /// Moves to the next round, idle with a full timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` on the final round (checked first, so
    /// the final round always reports `OutOfRange`), and
    /// `DomainError::InvalidTransition` while a round is running or paused.
    pub fn advance(&mut self) -> Result<(), DomainError> {
        if self.is_final_round() {
            return Err(DomainError::OutOfRange(format!(
                "round {} is the final round of {}",
                self.current_round, self.total_rounds
            )));
        }
        self.require(&[SessionStatus::Idle, SessionStatus::Ended], "advance")?;
        self.current_round += 1;
        self.reset_round();
        Ok(())
    }

    /// Moves back to the previous round, idle with a full timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` on round 0 and
    /// `DomainError::InvalidTransition` while a round is running or paused.
    pub fn rewind(&mut self) -> Result<(), DomainError> {
        if self.current_round == 0 {
            return Err(DomainError::OutOfRange(
                "round 0 has no previous round".to_owned(),
            ));
        }
        self.require(&[SessionStatus::Idle, SessionStatus::Ended], "rewind")?;
        self.current_round -= 1;
        self.reset_round();
        Ok(())
    }

    /// Changes the round length and/or round count between rounds.
    ///
    /// A new round length also refills the timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` while a round is running or
    /// paused, and `DomainError::InvalidArgument` for a zero round length or a
    /// round count that would not contain the current round. Nothing changes
    /// on error.
    pub fn configure(
        &mut self,
        time_per_round: Option<u32>,
        total_rounds: Option<u32>,
    ) -> Result<(), DomainError> {
        self.require(&[SessionStatus::Idle, SessionStatus::Ended], "configure")?;
        if let Some(seconds) = time_per_round {
            validate_time_per_round(seconds)?;
        }
        if let Some(rounds) = total_rounds {
            validate_total_rounds(rounds, self.current_round)?;
        }

        if let Some(seconds) = time_per_round {
            self.time_per_round = seconds;
            self.time_remaining = seconds;
        }
        if let Some(rounds) = total_rounds {
            self.total_rounds = rounds;
        }
        Ok(())
    }

    /// Counts down one second while running.
    ///
    /// Reaching zero ends the round in the same step. Ticks in any other
    /// status are dropped, which is what makes a pause stop time.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::Running {
            return TickOutcome::Ignored;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return TickOutcome::Counted {
                time_remaining: self.time_remaining,
            };
        }

        let final_round = self.is_final_round();
        self.finish();
        TickOutcome::Exhausted {
            round: self.current_round,
            final_round,
        }
    }

    fn finish(&mut self) {
        self.status = SessionStatus::Ended;
        self.time_remaining = self.time_per_round;
    }

    fn reset_round(&mut self) {
        self.status = SessionStatus::Idle;
        self.time_remaining = self.time_per_round;
    }

    fn require(
        &self,
        allowed: &[SessionStatus],
        attempted: &'static str,
    ) -> Result<(), DomainError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(
                self.status.as_str(),
                attempted,
            ))
        }
    }
}

fn validate_time_per_round(seconds: u32) -> Result<(), DomainError> {
    if seconds == 0 {
        return Err(DomainError::InvalidArgument(
            "time per round must be at least one second".to_owned(),
        ));
    }
    Ok(())
}

fn validate_total_rounds(rounds: u32, current_round: u32) -> Result<(), DomainError> {
    if rounds == 0 {
        return Err(DomainError::InvalidArgument(
            "a session needs at least one round".to_owned(),
        ));
    }
    if rounds <= current_round {
        return Err(DomainError::InvalidArgument(format!(
            "cannot shrink to {rounds} rounds while on round {current_round}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(total_rounds: u32, time_per_round: u32) -> RoundStateMachine {
        let mut machine = RoundStateMachine::new(total_rounds, time_per_round).unwrap();
        machine.start().unwrap();
        machine
    }

    #[test]
    fn test_new_machine_is_idle_at_round_zero_with_full_timer() {
        let machine = RoundStateMachine::new(4, 600).unwrap();

        assert_eq!(machine.status(), SessionStatus::Idle);
        assert_eq!(machine.current_round(), 0);
        assert_eq!(machine.total_rounds(), 4);
        assert_eq!(machine.time_remaining(), 600);
    }

    #[test]
    fn test_new_rejects_zero_rounds_or_zero_seconds() {
        assert!(matches!(
            RoundStateMachine::new(0, 600),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            RoundStateMachine::new(3, 0),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_start_twice_fails_and_leaves_state_unchanged() {
        // Arrange
        let mut machine = running(3, 60);
        let before = machine.clone();

        // Act
        let result = machine.start();

        // Assert
        assert_eq!(
            result,
            Err(DomainError::InvalidTransition {
                from: "running",
                attempted: "start",
            })
        );
        assert_eq!(machine, before);
    }

    #[test]
    fn test_pause_and_resume_toggle_between_running_and_paused() {
        let mut machine = running(3, 60);

        machine.pause().unwrap();
        assert_eq!(machine.status(), SessionStatus::Paused);

        machine.resume().unwrap();
        assert_eq!(machine.status(), SessionStatus::Running);
    }

    #[test]
    fn test_pause_and_resume_reject_wrong_status() {
        let mut machine = RoundStateMachine::new(3, 60).unwrap();

        assert!(matches!(
            machine.pause(),
            Err(DomainError::InvalidTransition { from: "idle", .. })
        ));
        assert!(matches!(
            machine.resume(),
            Err(DomainError::InvalidTransition { from: "idle", .. })
        ));

        machine.start().unwrap();
        assert!(matches!(
            machine.resume(),
            Err(DomainError::InvalidTransition {
                from: "running",
                attempted: "resume",
            })
        ));
    }

    #[test]
    fn test_end_resets_timer_to_full_round() {
        // Arrange
        let mut machine = running(3, 60);
        machine.tick();
        machine.tick();
        assert_eq!(machine.time_remaining(), 58);

        // Act
        machine.end().unwrap();

        // Assert
        assert_eq!(machine.status(), SessionStatus::Ended);
        assert_eq!(machine.time_remaining(), 60);
    }

    #[test]
    fn test_end_from_paused_is_allowed() {
        let mut machine = running(3, 60);
        machine.pause().unwrap();

        machine.end().unwrap();

        assert_eq!(machine.status(), SessionStatus::Ended);
    }

    #[test]
    fn test_end_twice_is_rejected() {
        let mut machine = running(3, 60);
        machine.end().unwrap();

        let result = machine.end();

        assert_eq!(
            result,
            Err(DomainError::InvalidTransition {
                from: "ended",
                attempted: "end",
            })
        );
    }

    #[test]
    fn test_tick_counts_down_only_while_running() {
        // Arrange
        let mut machine = RoundStateMachine::new(3, 10).unwrap();

        // Act / Assert
        assert_eq!(machine.tick(), TickOutcome::Ignored);
        assert_eq!(machine.time_remaining(), 10);

        machine.start().unwrap();
        assert_eq!(machine.tick(), TickOutcome::Counted { time_remaining: 9 });

        machine.pause().unwrap();
        for _ in 0..25 {
            assert_eq!(machine.tick(), TickOutcome::Ignored);
        }
        assert_eq!(machine.time_remaining(), 9);
    }

    #[test]
    fn test_tick_reaching_zero_ends_round_in_same_step() {
        // Arrange
        let mut machine = running(3, 2);
        machine.tick();

        // Act
        let outcome = machine.tick();

        // Assert
        assert_eq!(
            outcome,
            TickOutcome::Exhausted {
                round: 0,
                final_round: false,
            }
        );
        assert_eq!(machine.status(), SessionStatus::Ended);
        assert_eq!(machine.time_remaining(), 2);
        assert_eq!(machine.tick(), TickOutcome::Ignored);
    }

    #[test]
    fn test_tick_exhausting_last_round_reports_final_round() {
        let mut machine = RoundStateMachine::new(2, 1).unwrap();
        machine.start().unwrap();
        machine.tick();
        machine.advance().unwrap();
        machine.start().unwrap();

        let outcome = machine.tick();

        assert_eq!(
            outcome,
            TickOutcome::Exhausted {
                round: 1,
                final_round: true,
            }
        );
    }

    #[test]
    fn test_advance_moves_to_next_idle_round() {
        // Arrange
        let mut machine = running(3, 60);
        machine.tick();
        machine.end().unwrap();

        // Act
        machine.advance().unwrap();

        // Assert
        assert_eq!(machine.current_round(), 1);
        assert_eq!(machine.status(), SessionStatus::Idle);
        assert_eq!(machine.time_remaining(), 60);
    }

    #[test]
    fn test_advance_from_idle_skips_round() {
        let mut machine = RoundStateMachine::new(3, 60).unwrap();

        machine.advance().unwrap();

        assert_eq!(machine.current_round(), 1);
    }

    #[test]
    fn test_advance_while_running_is_invalid_transition() {
        let mut machine = running(3, 60);

        assert!(matches!(
            machine.advance(),
            Err(DomainError::InvalidTransition {
                from: "running",
                attempted: "advance",
            })
        ));
        assert_eq!(machine.current_round(), 0);
    }

    #[test]
    fn test_advance_on_final_round_is_out_of_range_and_changes_nothing() {
        // Arrange
        let mut machine = RoundStateMachine::new(2, 60).unwrap();
        machine.advance().unwrap();
        machine.start().unwrap();
        machine.end().unwrap();
        let before = machine.clone();

        // Act
        let result = machine.advance();

        // Assert
        assert!(matches!(result, Err(DomainError::OutOfRange(_))));
        assert_eq!(machine, before);
    }

    #[test]
    fn test_single_round_session_cannot_advance() {
        let mut machine = RoundStateMachine::new(1, 60).unwrap();

        assert!(machine.is_final_round());
        assert!(matches!(machine.advance(), Err(DomainError::OutOfRange(_))));
    }

    #[test]
    fn test_rewind_returns_to_previous_round() {
        let mut machine = RoundStateMachine::new(3, 60).unwrap();
        machine.advance().unwrap();
        machine.advance().unwrap();

        machine.rewind().unwrap();

        assert_eq!(machine.current_round(), 1);
        assert_eq!(machine.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_rewind_at_round_zero_is_out_of_range() {
        let mut machine = RoundStateMachine::new(3, 60).unwrap();

        assert!(matches!(machine.rewind(), Err(DomainError::OutOfRange(_))));
    }

    #[test]
    fn test_configure_refills_timer_and_changes_round_count() {
        // Arrange
        let mut machine = RoundStateMachine::new(4, 600).unwrap();

        // Act
        machine.configure(Some(90), Some(6)).unwrap();

        // Assert
        assert_eq!(machine.time_per_round(), 90);
        assert_eq!(machine.time_remaining(), 90);
        assert_eq!(machine.total_rounds(), 6);
    }

    #[test]
    fn test_configure_rejects_round_count_below_current_round() {
        // Arrange
        let mut machine = RoundStateMachine::new(4, 600).unwrap();
        machine.advance().unwrap();
        machine.advance().unwrap();
        let before = machine.clone();

        // Act
        let result = machine.configure(Some(30), Some(2));

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert_eq!(machine, before);
    }

    #[test]
    fn test_configure_is_rejected_mid_round() {
        let mut machine = running(4, 600);

        assert!(matches!(
            machine.configure(Some(30), None),
            Err(DomainError::InvalidTransition {
                from: "running",
                attempted: "configure",
            })
        ));
    }
}
