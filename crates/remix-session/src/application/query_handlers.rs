//! Query handlers for relay sessions.
//!
//! Queries read the aggregate and return owned, serializable views; they
//! never change state.

use chrono::{DateTime, Utc};
use remix_core::error::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::RelaySession;
use crate::domain::challenge::{Challenge, RoundBrief};
use crate::domain::ledger::Submission;
use crate::domain::roster::{Team, TeamId};
use crate::domain::round::SessionStatus;

/// Snapshot of round progress, as shown to facilitators and participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStateView {
    /// The session identifier.
    pub session_id: Uuid,
    /// Lifecycle status of the current round.
    pub status: SessionStatus,
    /// Zero-based index of the current round.
    pub current_round: u32,
    /// Number of rounds in the session.
    pub total_rounds: u32,
    /// Round length in seconds.
    pub time_per_round: u32,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
}

/// Read-only view of a recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionView {
    /// Round the work was submitted for.
    pub round_index: u32,
    /// Submitting team.
    pub team_id: TeamId,
    /// The submitted content.
    pub content: String,
    /// When this version was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl From<&Submission> for SubmissionView {
    fn from(submission: &Submission) -> Self {
        Self {
            round_index: submission.round_index,
            team_id: submission.team_id.clone(),
            content: submission.content.clone(),
            recorded_at: submission.recorded_at,
        }
    }
}

/// A team with its final-round work, if it submitted any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalSubmissionView {
    /// The team.
    pub team: Team,
    /// Its final-round submission.
    pub submission: Option<SubmissionView>,
}

/// Returns the round progress snapshot.
#[must_use]
pub fn get_session_state(session: &RelaySession) -> SessionStateView {
    let machine = session.machine();
    SessionStateView {
        session_id: session.id,
        status: machine.status(),
        current_round: machine.current_round(),
        total_rounds: machine.total_rounds(),
        time_per_round: machine.time_per_round(),
        time_remaining: machine.time_remaining(),
    }
}

/// Returns a team's latest submission for a round, if any.
#[must_use]
pub fn get_submission(
    session: &RelaySession,
    round_index: u32,
    team_id: &TeamId,
) -> Option<SubmissionView> {
    session
        .submission(round_index, team_id)
        .map(SubmissionView::from)
}

/// Returns the submission `team_id` builds on in `round`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the team is not on the roster.
pub fn get_inherited_submission(
    session: &RelaySession,
    round: u32,
    team_id: &TeamId,
) -> Result<Option<SubmissionView>, DomainError> {
    Ok(session
        .inherited_submission(round, team_id)?
        .map(SubmissionView::from))
}

/// Returns the instructions for a round.
///
/// # Errors
///
/// Returns `DomainError::OutOfRange` for a round past the session.
pub fn get_round_brief(session: &RelaySession, round: u32) -> Result<RoundBrief, DomainError> {
    session.round_brief(round)
}

/// Returns every team in rotation order with its final-round work.
#[must_use]
pub fn get_final_submissions(session: &RelaySession) -> Vec<FinalSubmissionView> {
    session
        .final_submissions()
        .into_iter()
        .map(|(team, submission)| FinalSubmissionView {
            team: team.clone(),
            submission: submission.map(SubmissionView::from),
        })
        .collect()
}

/// Returns the roster in rotation order.
#[must_use]
pub fn get_roster(session: &RelaySession) -> Vec<Team> {
    session.roster().teams().to_vec()
}

/// Returns the selected challenge, if any.
#[must_use]
pub fn get_challenge(session: &RelaySession) -> Option<Challenge> {
    session.challenge().cloned()
}
