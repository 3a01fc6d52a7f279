//! The session task: sole owner of a [`RelaySession`].
//!
//! Commands, queries and clock ticks are applied strictly one at a time.
//! Queued requests are always drained before a pending tick, so once a pause
//! or end has been acknowledged no further tick can change the countdown.

use std::sync::Arc;

use remix_core::clock::Clock;
use remix_core::command::Command;
use remix_core::error::DomainError;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info};

use super::clock::SessionClock;
use super::command_handlers::{self, SessionCommandResult};
use super::query_handlers::{self, FinalSubmissionView, SessionStateView, SubmissionView};
use crate::domain::aggregates::RelaySession;
use crate::domain::challenge::{Challenge, RoundBrief};
use crate::domain::commands::SessionCommand;
use crate::domain::events::{SessionEvent, SessionEventKind};
use crate::domain::roster::{Team, TeamId};
use crate::domain::round::{SessionStatus, TickOutcome};

/// One-shot reply channel for a request.
pub(crate) type Reply<T> = oneshot::Sender<Result<T, DomainError>>;

/// Work queued for the session task.
#[derive(Debug)]
pub(crate) enum SessionRequest {
    Execute {
        command: SessionCommand,
        reply: Reply<SessionCommandResult>,
    },
    State {
        reply: Reply<SessionStateView>,
    },
    Submission {
        round_index: u32,
        team_id: TeamId,
        reply: Reply<Option<SubmissionView>>,
    },
    InheritedSubmission {
        round: u32,
        team_id: TeamId,
        reply: Reply<Option<SubmissionView>>,
    },
    RoundBrief {
        round: u32,
        reply: Reply<RoundBrief>,
    },
    FinalSubmissions {
        reply: Reply<Vec<FinalSubmissionView>>,
    },
    Roster {
        reply: Reply<Vec<Team>>,
    },
    Challenge {
        reply: Reply<Option<Challenge>>,
    },
    Shutdown,
}

enum Step {
    Request(SessionRequest),
    Tick,
    Stop,
}

pub(crate) struct SessionRunner {
    session: RelaySession,
    ticker: SessionClock,
    clock: Arc<dyn Clock>,
    requests: mpsc::Receiver<SessionRequest>,
    events: broadcast::Sender<SessionEvent>,
    state: watch::Sender<SessionStateView>,
}

impl SessionRunner {
    pub(crate) fn new(
        session: RelaySession,
        ticker: SessionClock,
        clock: Arc<dyn Clock>,
        requests: mpsc::Receiver<SessionRequest>,
        events: broadcast::Sender<SessionEvent>,
        state: watch::Sender<SessionStateView>,
    ) -> Self {
        Self {
            session,
            ticker,
            clock,
            requests,
            events,
            state,
        }
    }

    pub(crate) async fn run(mut self) {
        info!(session_id = %self.session.id, "session task started");
        loop {
            let step = tokio::select! {
                biased;
                request = self.requests.recv() => match request {
                    Some(SessionRequest::Shutdown) | None => Step::Stop,
                    Some(request) => Step::Request(request),
                },
                () = self.ticker.next_tick() => Step::Tick,
            };
            match step {
                Step::Request(request) => self.handle_request(request),
                Step::Tick => self.handle_tick(),
                Step::Stop => break,
            }
        }
        self.ticker.stop();
        info!(session_id = %self.session.id, "session task stopped");
    }

    fn handle_request(&mut self, request: SessionRequest) {
        let session = &self.session;
        match request {
            SessionRequest::Execute { command, reply } => {
                let result = self.execute(&command);
                // The caller may have given up waiting; the command still stands.
                let _ = reply.send(result);
            }
            SessionRequest::State { reply } => {
                let _ = reply.send(Ok(query_handlers::get_session_state(session)));
            }
            SessionRequest::Submission {
                round_index,
                team_id,
                reply,
            } => {
                let view = query_handlers::get_submission(session, round_index, &team_id);
                let _ = reply.send(Ok(view));
            }
            SessionRequest::InheritedSubmission {
                round,
                team_id,
                reply,
            } => {
                let _ = reply.send(query_handlers::get_inherited_submission(
                    session, round, &team_id,
                ));
            }
            SessionRequest::RoundBrief { round, reply } => {
                let _ = reply.send(query_handlers::get_round_brief(session, round));
            }
            SessionRequest::FinalSubmissions { reply } => {
                let _ = reply.send(Ok(query_handlers::get_final_submissions(session)));
            }
            SessionRequest::Roster { reply } => {
                let _ = reply.send(Ok(query_handlers::get_roster(session)));
            }
            SessionRequest::Challenge { reply } => {
                let _ = reply.send(Ok(query_handlers::get_challenge(session)));
            }
            SessionRequest::Shutdown => {}
        }
    }

    fn execute(&mut self, command: &SessionCommand) -> Result<SessionCommandResult, DomainError> {
        let result = command_handlers::handle_command(command, &mut self.session, &*self.clock);
        match &result {
            Ok(outcome) => {
                info!(
                    session_id = %self.session.id,
                    correlation_id = %command.correlation_id(),
                    command_type = command.command_type(),
                    origin = %command.origin(),
                    status = %self.session.status(),
                    round = self.session.machine().current_round(),
                    "session command applied"
                );
                self.sync_ticker();
                self.publish_state();
                self.publish_events(&outcome.events);
            }
            Err(error) => {
                debug!(
                    session_id = %self.session.id,
                    correlation_id = %command.correlation_id(),
                    command_type = command.command_type(),
                    error = %error,
                    "session command rejected"
                );
            }
        }
        result
    }

    fn handle_tick(&mut self) {
        match self.session.tick(&*self.clock) {
            TickOutcome::Ignored => {}
            TickOutcome::Counted { time_remaining } => {
                debug!(session_id = %self.session.id, time_remaining, "tick");
            }
            TickOutcome::Exhausted { round, final_round } => {
                info!(
                    session_id = %self.session.id,
                    round,
                    final_round,
                    "round time exhausted"
                );
            }
        }
        self.sync_ticker();
        self.publish_state();
        let events = self.session.take_uncommitted_events();
        self.publish_events(&events);
    }

    /// Runs the ticker exactly while the round is running.
    fn sync_ticker(&mut self) {
        let running = self.session.status() == SessionStatus::Running;
        if running && !self.ticker.is_running() {
            self.ticker.start();
        } else if !running && self.ticker.is_running() {
            self.ticker.stop();
        }
    }

    fn publish_state(&self) {
        let next = query_handlers::get_session_state(&self.session);
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn publish_events(&self, events: &[SessionEvent]) {
        for event in events {
            if let SessionEventKind::RoundExhausted(exhausted) = &event.kind {
                info!(
                    session_id = %self.session.id,
                    round = exhausted.round,
                    message = exhausted.message(),
                    "announcing end of round"
                );
            }
            // No subscribers is fine; events are notifications, not a log.
            let _ = self.events.send(event.clone());
        }
    }
}
