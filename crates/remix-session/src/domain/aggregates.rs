//! Aggregate root for a relay session.

use remix_core::clock::Clock;
use remix_core::command::new_correlation_id;
use remix_core::error::DomainError;
use remix_core::event::EventMetadata;
use uuid::Uuid;

use super::challenge::{Challenge, RoundBrief, brief_for_round};
use super::events::{
    ChallengeSelected, RosterChanged, RoundAdvanced, RoundEnded, RoundExhausted, RoundPaused,
    RoundResumed, RoundRewound, RoundStarted, SessionEvent, SessionEventKind, SubmissionRecorded,
    TimingChanged,
};
use super::ledger::{Submission, SubmissionLedger};
use super::roster::{NewTeam, Roster, Team, TeamId};
use super::rotation::resolve_inherited_submission;
use super::round::{RoundStateMachine, SessionStatus, TickOutcome};

/// The aggregate root for one relay session.
///
/// Composes the round state machine, the submission ledger, the live roster
/// and the selected challenge. Every accepted command appends one event to
/// the uncommitted list; rejected commands change nothing.
#[derive(Debug)]
pub struct RelaySession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Number of events already handed out.
    pub(crate) version: i64,
    machine: RoundStateMachine,
    ledger: SubmissionLedger,
    roster: Roster,
    challenge: Option<Challenge>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<SessionEvent>,
}

impl RelaySession {
    /// Creates a session idle at round 0.
    #[must_use]
    pub fn new(id: Uuid, machine: RoundStateMachine, roster: Roster) -> Self {
        Self {
            id,
            version: 0,
            machine,
            ledger: SubmissionLedger::new(),
            roster,
            challenge: None,
            uncommitted_events: Vec::new(),
        }
    }

    /// Round index, status and countdown.
    #[must_use]
    pub fn machine(&self) -> &RoundStateMachine {
        &self.machine
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.machine.status()
    }

    /// All recorded submissions.
    #[must_use]
    pub fn ledger(&self) -> &SubmissionLedger {
        &self.ledger
    }

    /// The live roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The selected challenge, if any.
    #[must_use]
    pub fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// Number of events already handed out via [`Self::take_uncommitted_events`].
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record_event(&mut self, kind: SessionEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        // TODO: event_id is still Uuid::new_v4(); replaying a session from its
        // command log will not reproduce event ids until ids come from an
        // injected generator.
        let metadata = EventMetadata::caused_by(
            kind.event_type(),
            self.id,
            self.next_sequence_number(),
            correlation_id,
            clock,
        );
        self.uncommitted_events.push(SessionEvent { metadata, kind });
    }

    /// Starts the current round's countdown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the session is idle.
    pub fn start(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.start()?;
        let kind = SessionEventKind::RoundStarted(RoundStarted {
            session_id: self.id,
            round: self.machine.current_round(),
            time_remaining: self.machine.time_remaining(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Pauses the running countdown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the round is running.
    pub fn pause(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.pause()?;
        let kind = SessionEventKind::RoundPaused(RoundPaused {
            session_id: self.id,
            round: self.machine.current_round(),
            time_remaining: self.machine.time_remaining(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Resumes a paused countdown.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the round is paused.
    pub fn resume(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.resume()?;
        let kind = SessionEventKind::RoundResumed(RoundResumed {
            session_id: self.id,
            round: self.machine.current_round(),
            time_remaining: self.machine.time_remaining(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Ends the current round early.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the round is running or
    /// paused.
    pub fn end(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.end()?;
        let kind = SessionEventKind::RoundEnded(RoundEnded {
            session_id: self.id,
            round: self.machine.current_round(),
            final_round: self.machine.is_final_round(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Moves to the next round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` on the final round and
    /// `DomainError::InvalidTransition` mid-round.
    pub fn advance(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.advance()?;
        let kind = SessionEventKind::RoundAdvanced(RoundAdvanced {
            session_id: self.id,
            round: self.machine.current_round(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Steps back to the previous round.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` on round 0 and
    /// `DomainError::InvalidTransition` mid-round.
    pub fn rewind(&mut self, correlation_id: Uuid, clock: &dyn Clock) -> Result<(), DomainError> {
        self.machine.rewind()?;
        let kind = SessionEventKind::RoundRewound(RoundRewound {
            session_id: self.id,
            round: self.machine.current_round(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Changes round length and/or count between rounds.
    ///
    /// # Errors
    ///
    /// See [`RoundStateMachine::configure`].
    pub fn configure_timing(
        &mut self,
        time_per_round: Option<u32>,
        total_rounds: Option<u32>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.machine.configure(time_per_round, total_rounds)?;
        let kind = SessionEventKind::TimingChanged(TimingChanged {
            session_id: self.id,
            time_per_round: self.machine.time_per_round(),
            total_rounds: self.machine.total_rounds(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Delivers one clock tick.
    ///
    /// Only an exhausted countdown produces an event; ordinary ticks are
    /// visible through the state snapshot alone.
    pub fn tick(&mut self, clock: &dyn Clock) -> TickOutcome {
        let outcome = self.machine.tick();
        if let TickOutcome::Exhausted { round, final_round } = outcome {
            let kind = SessionEventKind::RoundExhausted(RoundExhausted {
                session_id: self.id,
                round,
                final_round,
            });
            self.record_event(kind, new_correlation_id(), clock);
        }
        outcome
    }

    /// Records a team's work for a round, replacing any earlier version.
    ///
    /// Work can be submitted for the current round or any earlier one, also
    /// after the round has ended.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the team is not on the
    /// roster, the round has not been reached yet, or the content is blank.
    pub fn submit(
        &mut self,
        round_index: u32,
        team_id: &TeamId,
        content: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if !self.roster.contains(team_id) {
            return Err(DomainError::InvalidArgument(format!(
                "team {team_id} is not on the roster"
            )));
        }
        if round_index > self.machine.current_round() {
            return Err(DomainError::InvalidArgument(format!(
                "round {round_index} has not been reached yet (current round is {})",
                self.machine.current_round()
            )));
        }

        self.ledger
            .record(round_index, team_id, content, clock.now())?;
        let kind = SessionEventKind::SubmissionRecorded(SubmissionRecorded {
            session_id: self.id,
            round: round_index,
            team_id: team_id.clone(),
        });
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// Appends a team to the rotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a duplicate id or blank name.
    pub fn add_team(
        &mut self,
        team: NewTeam,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.roster.add(team)?;
        self.record_roster_changed(correlation_id, clock);
        Ok(())
    }

    /// Drops a team from the rotation. Its submissions stay in the ledger.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the team is not on the roster.
    pub fn remove_team(
        &mut self,
        team_id: &TeamId,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<Team, DomainError> {
        let removed = self.roster.remove(team_id)?;
        self.record_roster_changed(correlation_id, clock);
        Ok(removed)
    }

    /// Replaces the roster wholesale. The old roster is kept if the new one is
    /// invalid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for duplicate ids or blank names.
    pub fn replace_roster(
        &mut self,
        teams: Vec<NewTeam>,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.roster = Roster::from_teams(teams)?;
        self.record_roster_changed(correlation_id, clock);
        Ok(())
    }

    fn record_roster_changed(&mut self, correlation_id: Uuid, clock: &dyn Clock) {
        let kind = SessionEventKind::RosterChanged(RosterChanged {
            session_id: self.id,
            team_ids: self.roster.team_ids(),
        });
        self.record_event(kind, correlation_id, clock);
    }

    /// Selects the challenge the session works on.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the title is blank.
    pub fn select_challenge(
        &mut self,
        challenge: Challenge,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if challenge.title.trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "challenge title must not be blank".to_owned(),
            ));
        }
        let kind = SessionEventKind::ChallengeSelected(ChallengeSelected {
            session_id: self.id,
            title: challenge.title.clone(),
        });
        self.challenge = Some(challenge);
        self.record_event(kind, correlation_id, clock);
        Ok(())
    }

    /// A team's latest submission for a round.
    #[must_use]
    pub fn submission(&self, round_index: u32, team_id: &TeamId) -> Option<&Submission> {
        self.ledger.get(round_index, team_id)
    }

    /// The submission `team_id` builds on in `round`, over the live roster.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the team is not on the roster.
    pub fn inherited_submission(
        &self,
        round: u32,
        team_id: &TeamId,
    ) -> Result<Option<&Submission>, DomainError> {
        resolve_inherited_submission(self.roster.teams(), round, team_id, &self.ledger)
    }

    /// Instructions for a round under the selected challenge.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` for a round past the session.
    pub fn round_brief(&self, round: u32) -> Result<RoundBrief, DomainError> {
        brief_for_round(self.challenge.as_ref(), round, self.machine.total_rounds())
    }

    /// Every team in rotation order with its final-round submission, if any.
    #[must_use]
    pub fn final_submissions(&self) -> Vec<(&Team, Option<&Submission>)> {
        let final_round = self.machine.total_rounds() - 1;
        self.roster
            .teams()
            .iter()
            .map(|team| (team, self.ledger.get(final_round, &team.id)))
            .collect()
    }

    /// Hands out the events produced since the last call.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<SessionEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }

    /// Events produced since the last [`Self::take_uncommitted_events`].
    #[cfg(test)]
    #[must_use]
    pub(crate) fn uncommitted_events(&self) -> &[SessionEvent] {
        &self.uncommitted_events
    }
}
