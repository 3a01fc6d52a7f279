//! Commands accepted by a relay session.

use remix_core::command::{Command, CommandOrigin};
use uuid::Uuid;

use super::challenge::Challenge;
use super::roster::{NewTeam, TeamId};

/// Command to start the current round's countdown.
#[derive(Debug, Clone)]
pub struct StartRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for StartRound {
    fn command_type(&self) -> &'static str {
        "session.start_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to pause the running countdown.
#[derive(Debug, Clone)]
pub struct PauseRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for PauseRound {
    fn command_type(&self) -> &'static str {
        "session.pause_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to resume a paused countdown.
#[derive(Debug, Clone)]
pub struct ResumeRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResumeRound {
    fn command_type(&self) -> &'static str {
        "session.resume_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to end the current round early.
#[derive(Debug, Clone)]
pub struct EndRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for EndRound {
    fn command_type(&self) -> &'static str {
        "session.end_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to move on to the next round.
#[derive(Debug, Clone)]
pub struct AdvanceRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for AdvanceRound {
    fn command_type(&self) -> &'static str {
        "session.advance_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to step back to the previous round.
#[derive(Debug, Clone)]
pub struct RewindRound {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for RewindRound {
    fn command_type(&self) -> &'static str {
        "session.rewind_round"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to change the round length and/or number of rounds.
#[derive(Debug, Clone)]
pub struct ConfigureTiming {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// New round length in seconds, if changing.
    pub time_per_round: Option<u32>,
    /// New number of rounds, if changing.
    pub total_rounds: Option<u32>,
}

impl Command for ConfigureTiming {
    fn command_type(&self) -> &'static str {
        "session.configure_timing"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record a team's work for a round.
#[derive(Debug, Clone)]
pub struct SubmitWork {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Round the work belongs to.
    pub round_index: u32,
    /// Submitting team.
    pub team_id: TeamId,
    /// The work itself.
    pub content: String,
}

impl Command for SubmitWork {
    fn command_type(&self) -> &'static str {
        "session.submit_work"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn origin(&self) -> CommandOrigin {
        CommandOrigin::Participant
    }
}

/// Command to append a team to the rotation.
#[derive(Debug, Clone)]
pub struct AddTeam {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The team to add.
    pub team: NewTeam,
}

impl Command for AddTeam {
    fn command_type(&self) -> &'static str {
        "session.add_team"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to drop a team from the rotation.
#[derive(Debug, Clone)]
pub struct RemoveTeam {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The team to remove.
    pub team_id: TeamId,
}

impl Command for RemoveTeam {
    fn command_type(&self) -> &'static str {
        "session.remove_team"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace the whole roster, in rotation order.
#[derive(Debug, Clone)]
pub struct ReplaceRoster {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The new roster.
    pub teams: Vec<NewTeam>,
}

impl Command for ReplaceRoster {
    fn command_type(&self) -> &'static str {
        "session.replace_roster"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to select the challenge the session works on.
#[derive(Debug, Clone)]
pub struct SelectChallenge {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The challenge.
    pub challenge: Challenge,
}

impl Command for SelectChallenge {
    fn command_type(&self) -> &'static str {
        "session.select_challenge"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Any command a session accepts, as queued for the session task.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// See [`StartRound`].
    Start(StartRound),
    /// See [`PauseRound`].
    Pause(PauseRound),
    /// See [`ResumeRound`].
    Resume(ResumeRound),
    /// See [`EndRound`].
    End(EndRound),
    /// See [`AdvanceRound`].
    Advance(AdvanceRound),
    /// See [`RewindRound`].
    Rewind(RewindRound),
    /// See [`ConfigureTiming`].
    ConfigureTiming(ConfigureTiming),
    /// See [`SubmitWork`].
    Submit(SubmitWork),
    /// See [`AddTeam`].
    AddTeam(AddTeam),
    /// See [`RemoveTeam`].
    RemoveTeam(RemoveTeam),
    /// See [`ReplaceRoster`].
    ReplaceRoster(ReplaceRoster),
    /// See [`SelectChallenge`].
    SelectChallenge(SelectChallenge),
}

impl SessionCommand {
    fn inner(&self) -> &dyn Command {
        match self {
            Self::Start(c) => c,
            Self::Pause(c) => c,
            Self::Resume(c) => c,
            Self::End(c) => c,
            Self::Advance(c) => c,
            Self::Rewind(c) => c,
            Self::ConfigureTiming(c) => c,
            Self::Submit(c) => c,
            Self::AddTeam(c) => c,
            Self::RemoveTeam(c) => c,
            Self::ReplaceRoster(c) => c,
            Self::SelectChallenge(c) => c,
        }
    }
}

impl Command for SessionCommand {
    fn command_type(&self) -> &'static str {
        self.inner().command_type()
    }

    fn correlation_id(&self) -> Uuid {
        self.inner().correlation_id()
    }

    fn origin(&self) -> CommandOrigin {
        self.inner().origin()
    }
}

impl From<StartRound> for SessionCommand {
    fn from(command: StartRound) -> Self {
        Self::Start(command)
    }
}

impl From<PauseRound> for SessionCommand {
    fn from(command: PauseRound) -> Self {
        Self::Pause(command)
    }
}

impl From<ResumeRound> for SessionCommand {
    fn from(command: ResumeRound) -> Self {
        Self::Resume(command)
    }
}

impl From<EndRound> for SessionCommand {
    fn from(command: EndRound) -> Self {
        Self::End(command)
    }
}

impl From<AdvanceRound> for SessionCommand {
    fn from(command: AdvanceRound) -> Self {
        Self::Advance(command)
    }
}

impl From<RewindRound> for SessionCommand {
    fn from(command: RewindRound) -> Self {
        Self::Rewind(command)
    }
}

impl From<ConfigureTiming> for SessionCommand {
    fn from(command: ConfigureTiming) -> Self {
        Self::ConfigureTiming(command)
    }
}

impl From<SubmitWork> for SessionCommand {
    fn from(command: SubmitWork) -> Self {
        Self::Submit(command)
    }
}

impl From<AddTeam> for SessionCommand {
    fn from(command: AddTeam) -> Self {
        Self::AddTeam(command)
    }
}

impl From<RemoveTeam> for SessionCommand {
    fn from(command: RemoveTeam) -> Self {
        Self::RemoveTeam(command)
    }
}

impl From<ReplaceRoster> for SessionCommand {
    fn from(command: ReplaceRoster) -> Self {
        Self::ReplaceRoster(command)
    }
}

impl From<SelectChallenge> for SessionCommand {
    fn from(command: SelectChallenge) -> Self {
        Self::SelectChallenge(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_work_is_relayed_from_participant() {
        let command = SessionCommand::from(SubmitWork {
            correlation_id: Uuid::new_v4(),
            round_index: 0,
            team_id: TeamId::from("A"),
            content: "idea".to_owned(),
        });

        assert_eq!(command.command_type(), "session.submit_work");
        assert_eq!(command.origin(), CommandOrigin::Participant);
    }

    #[test]
    fn test_wrapped_command_keeps_correlation_id() {
        let correlation_id = Uuid::new_v4();

        let command = SessionCommand::from(PauseRound { correlation_id });

        assert_eq!(command.correlation_id(), correlation_id);
        assert_eq!(command.origin(), CommandOrigin::Facilitator);
    }
}
