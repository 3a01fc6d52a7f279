//! Cheap, cloneable handle to a running session task.

use std::fmt;
use std::sync::Arc;

use remix_core::clock::Clock;
use remix_core::command::new_correlation_id;
use remix_core::error::DomainError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use uuid::Uuid;

use super::clock::SessionClock;
use super::command_handlers::SessionCommandResult;
use super::query_handlers::{self, FinalSubmissionView, SessionStateView, SubmissionView};
use super::runner::{Reply, SessionRequest, SessionRunner};
use super::settings::SessionSettings;
use crate::domain::aggregates::RelaySession;
use crate::domain::challenge::{Challenge, RoundBrief};
use crate::domain::commands::{
    AddTeam, AdvanceRound, ConfigureTiming, EndRound, PauseRound, RemoveTeam, ReplaceRoster,
    ResumeRound, RewindRound, SelectChallenge, SessionCommand, StartRound, SubmitWork,
};
use crate::domain::events::SessionEvent;
use crate::domain::roster::{NewTeam, Roster, Team, TeamId};

const REQUEST_QUEUE_CAPACITY: usize = 64;
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Starts a session task on the current Tokio runtime.
///
/// The session starts idle at round 0 with the given roster. `clock` stamps
/// events and submissions; the countdown itself runs on Tokio time.
///
/// # Errors
///
/// Returns `DomainError::InvalidArgument` for invalid settings.
pub fn spawn_session(
    session_id: Uuid,
    settings: &SessionSettings,
    roster: Roster,
    clock: Arc<dyn Clock>,
) -> Result<SessionHandle, DomainError> {
    let machine = settings.state_machine()?;
    let session = RelaySession::new(session_id, machine, roster);

    let (requests_tx, requests_rx) = mpsc::channel(REQUEST_QUEUE_CAPACITY);
    let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let (state_tx, state_rx) = watch::channel(query_handlers::get_session_state(&session));

    let runner = SessionRunner::new(
        session,
        SessionClock::new(settings.tick_period),
        clock,
        requests_rx,
        events_tx.clone(),
        state_tx,
    );
    tokio::spawn(runner.run());

    Ok(SessionHandle {
        session_id,
        requests: requests_tx,
        events: events_tx,
        state: state_rx,
    })
}

/// Handle to one session task.
///
/// Every clone talks to the same task. The task stops when
/// [`SessionHandle::shutdown`] is called or the last handle is dropped; after
/// that every call fails with `DomainError::Unavailable`.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: Uuid,
    requests: mpsc::Sender<SessionRequest>,
    events: broadcast::Sender<SessionEvent>,
    state: watch::Receiver<SessionStateView>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("session_id", &self.session_id)
            .field("closed", &self.requests.is_closed())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// The session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.session_id
    }

    fn unavailable(&self) -> DomainError {
        DomainError::Unavailable(format!("session {} is not running", self.session_id))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> SessionRequest,
    ) -> Result<T, DomainError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(build(reply))
            .await
            .map_err(|_| self.unavailable())?;
        response.await.map_err(|_| self.unavailable())?
    }

    /// Queues a command and waits for its outcome.
    ///
    /// # Errors
    ///
    /// Returns the command's rejection, or `DomainError::Unavailable` if the
    /// session task has stopped.
    pub async fn execute(
        &self,
        command: impl Into<SessionCommand>,
    ) -> Result<SessionCommandResult, DomainError> {
        let command = command.into();
        self.request(|reply| SessionRequest::Execute { command, reply })
            .await
    }

    /// Starts the current round's countdown.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn start(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(StartRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Pauses the countdown. No tick is applied after this returns.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn pause(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(PauseRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Resumes a paused countdown.
    ///
    /// The next tick fires one full tick period after this returns; the part
    /// of a period that had elapsed before the pause is discarded.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn resume(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(ResumeRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Ends the current round early.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn end(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(EndRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Moves to the next round.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn advance(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(AdvanceRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Steps back to the previous round.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn rewind(&self) -> Result<SessionCommandResult, DomainError> {
        self.execute(RewindRound {
            correlation_id: new_correlation_id(),
        })
        .await
    }

    /// Changes round length and/or count between rounds.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn configure_timing(
        &self,
        time_per_round: Option<u32>,
        total_rounds: Option<u32>,
    ) -> Result<SessionCommandResult, DomainError> {
        self.execute(ConfigureTiming {
            correlation_id: new_correlation_id(),
            time_per_round,
            total_rounds,
        })
        .await
    }

    /// Records a team's work for a round.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn submit(
        &self,
        round_index: u32,
        team_id: impl Into<TeamId>,
        content: impl Into<String>,
    ) -> Result<SessionCommandResult, DomainError> {
        self.execute(SubmitWork {
            correlation_id: new_correlation_id(),
            round_index,
            team_id: team_id.into(),
            content: content.into(),
        })
        .await
    }

    /// Appends a team to the rotation.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn add_team(&self, team: NewTeam) -> Result<SessionCommandResult, DomainError> {
        self.execute(AddTeam {
            correlation_id: new_correlation_id(),
            team,
        })
        .await
    }

    /// Drops a team from the rotation.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn remove_team(
        &self,
        team_id: impl Into<TeamId>,
    ) -> Result<SessionCommandResult, DomainError> {
        self.execute(RemoveTeam {
            correlation_id: new_correlation_id(),
            team_id: team_id.into(),
        })
        .await
    }

    /// Replaces the roster wholesale.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn replace_roster(
        &self,
        teams: Vec<NewTeam>,
    ) -> Result<SessionCommandResult, DomainError> {
        self.execute(ReplaceRoster {
            correlation_id: new_correlation_id(),
            teams,
        })
        .await
    }

    /// Selects the challenge.
    ///
    /// # Errors
    ///
    /// See [`Self::execute`].
    pub async fn select_challenge(
        &self,
        challenge: Challenge,
    ) -> Result<SessionCommandResult, DomainError> {
        self.execute(SelectChallenge {
            correlation_id: new_correlation_id(),
            challenge,
        })
        .await
    }

    /// Current round progress, ordered after every request queued before it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the session task has stopped.
    pub async fn state(&self) -> Result<SessionStateView, DomainError> {
        self.request(|reply| SessionRequest::State { reply }).await
    }

    /// A team's latest submission for a round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the session task has stopped.
    pub async fn submission(
        &self,
        round_index: u32,
        team_id: impl Into<TeamId>,
    ) -> Result<Option<SubmissionView>, DomainError> {
        let team_id = team_id.into();
        self.request(|reply| SessionRequest::Submission {
            round_index,
            team_id,
            reply,
        })
        .await
    }

    /// The submission `team_id` builds on in `round`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` for a team not on the roster.
    pub async fn inherited_submission(
        &self,
        round: u32,
        team_id: impl Into<TeamId>,
    ) -> Result<Option<SubmissionView>, DomainError> {
        let team_id = team_id.into();
        self.request(|reply| SessionRequest::InheritedSubmission {
            round,
            team_id,
            reply,
        })
        .await
    }

    /// Instructions for a round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` for a round past the session.
    pub async fn round_brief(&self, round: u32) -> Result<RoundBrief, DomainError> {
        self.request(|reply| SessionRequest::RoundBrief { round, reply })
            .await
    }

    /// Every team with its final-round work.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the session task has stopped.
    pub async fn final_submissions(&self) -> Result<Vec<FinalSubmissionView>, DomainError> {
        self.request(|reply| SessionRequest::FinalSubmissions { reply })
            .await
    }

    /// The roster in rotation order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the session task has stopped.
    pub async fn roster(&self) -> Result<Vec<Team>, DomainError> {
        self.request(|reply| SessionRequest::Roster { reply }).await
    }

    /// The selected challenge, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unavailable` if the session task has stopped.
    pub async fn challenge(&self) -> Result<Option<Challenge>, DomainError> {
        self.request(|reply| SessionRequest::Challenge { reply })
            .await
    }

    /// Subscribes to events produced from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Watches the round progress snapshot; it changes on every tick and
    /// every accepted command that affects it.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<SessionStateView> {
        self.state.clone()
    }

    /// Stops the session task after the requests already queued.
    ///
    /// Idempotent.
    pub async fn shutdown(&self) {
        // Already stopped is the desired outcome.
        let _ = self.requests.send(SessionRequest::Shutdown).await;
    }
}
