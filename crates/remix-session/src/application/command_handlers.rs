//! Command handlers for relay sessions.
//!
//! Each handler executes one command against the aggregate and hands back the
//! events it produced. A rejected command leaves the aggregate untouched.

use remix_core::clock::Clock;
use remix_core::error::DomainError;
use uuid::Uuid;

use super::query_handlers::{self, SessionStateView};
use crate::domain::aggregates::RelaySession;
use crate::domain::commands::{
    AddTeam, AdvanceRound, ConfigureTiming, EndRound, PauseRound, RemoveTeam, ReplaceRoster,
    ResumeRound, RewindRound, SelectChallenge, SessionCommand, StartRound, SubmitWork,
};
use crate::domain::events::SessionEvent;

/// Result of a successfully handled command.
#[derive(Debug, Clone)]
pub struct SessionCommandResult {
    /// The session the command was applied to.
    pub aggregate_id: Uuid,
    /// The events produced by the command, in order.
    pub events: Vec<SessionEvent>,
    /// Session snapshot taken in the same step as the command.
    pub state: SessionStateView,
}

fn committed(session: &mut RelaySession) -> SessionCommandResult {
    SessionCommandResult {
        aggregate_id: session.id,
        events: session.take_uncommitted_events(),
        state: query_handlers::get_session_state(session),
    }
}

/// Dispatches any session command to its handler.
///
/// # Errors
///
/// Returns the `DomainError` of the rejected command.
pub fn handle_command(
    command: &SessionCommand,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    match command {
        SessionCommand::Start(c) => handle_start_round(c, session, clock),
        SessionCommand::Pause(c) => handle_pause_round(c, session, clock),
        SessionCommand::Resume(c) => handle_resume_round(c, session, clock),
        SessionCommand::End(c) => handle_end_round(c, session, clock),
        SessionCommand::Advance(c) => handle_advance_round(c, session, clock),
        SessionCommand::Rewind(c) => handle_rewind_round(c, session, clock),
        SessionCommand::ConfigureTiming(c) => handle_configure_timing(c, session, clock),
        SessionCommand::Submit(c) => handle_submit_work(c, session, clock),
        SessionCommand::AddTeam(c) => handle_add_team(c, session, clock),
        SessionCommand::RemoveTeam(c) => handle_remove_team(c, session, clock),
        SessionCommand::ReplaceRoster(c) => handle_replace_roster(c, session, clock),
        SessionCommand::SelectChallenge(c) => handle_select_challenge(c, session, clock),
    }
}

/// Handles the `StartRound` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the session is idle.
pub fn handle_start_round(
    command: &StartRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.start(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `PauseRound` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the round is running.
pub fn handle_pause_round(
    command: &PauseRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.pause(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `ResumeRound` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the round is paused.
pub fn handle_resume_round(
    command: &ResumeRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.resume(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `EndRound` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless the round is running or
/// paused.
pub fn handle_end_round(
    command: &EndRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.end(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `AdvanceRound` command.
///
/// # Errors
///
/// Returns `DomainError::OutOfRange` on the final round and
/// `DomainError::InvalidTransition` mid-round.
pub fn handle_advance_round(
    command: &AdvanceRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.advance(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `RewindRound` command.
///
/// # Errors
///
/// Returns `DomainError::OutOfRange` on round 0 and
/// `DomainError::InvalidTransition` mid-round.
pub fn handle_rewind_round(
    command: &RewindRound,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.rewind(command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `ConfigureTiming` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` mid-round and
/// `DomainError::InvalidArgument` for values that would leave the session
/// without rounds or time.
pub fn handle_configure_timing(
    command: &ConfigureTiming,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.configure_timing(
        command.time_per_round,
        command.total_rounds,
        command.correlation_id,
        clock,
    )?;
    Ok(committed(session))
}

/// Handles the `SubmitWork` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for an unknown team, a future
/// round or blank content.
pub fn handle_submit_work(
    command: &SubmitWork,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.submit(
        command.round_index,
        &command.team_id,
        &command.content,
        command.correlation_id,
        clock,
    )?;
    Ok(committed(session))
}

/// Handles the `AddTeam` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for a duplicate id or blank name.
pub fn handle_add_team(
    command: &AddTeam,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.add_team(command.team.clone(), command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `RemoveTeam` command.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the team is not on the roster.
pub fn handle_remove_team(
    command: &RemoveTeam,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.remove_team(&command.team_id, command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `ReplaceRoster` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for duplicate ids or blank names.
pub fn handle_replace_roster(
    command: &ReplaceRoster,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.replace_roster(command.teams.clone(), command.correlation_id, clock)?;
    Ok(committed(session))
}

/// Handles the `SelectChallenge` command.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` if the title is blank.
pub fn handle_select_challenge(
    command: &SelectChallenge,
    session: &mut RelaySession,
    clock: &dyn Clock,
) -> Result<SessionCommandResult, DomainError> {
    session.select_challenge(command.challenge.clone(), command.correlation_id, clock)?;
    Ok(committed(session))
}
