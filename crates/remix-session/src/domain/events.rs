//! Domain events for relay sessions.

use remix_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roster::TeamId;

/// Emitted when a round's countdown starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The round that started.
    pub round: u32,
    /// Seconds on the clock.
    pub time_remaining: u32,
}

/// Emitted when a running round is paused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPaused {
    /// The session identifier.
    pub session_id: Uuid,
    /// The paused round.
    pub round: u32,
    /// Seconds left when paused.
    pub time_remaining: u32,
}

/// Emitted when a paused round resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResumed {
    /// The session identifier.
    pub session_id: Uuid,
    /// The resumed round.
    pub round: u32,
    /// Seconds left on resume.
    pub time_remaining: u32,
}

/// Emitted when a round is ended by command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEnded {
    /// The session identifier.
    pub session_id: Uuid,
    /// The round that ended.
    pub round: u32,
    /// Whether it was the last round.
    pub final_round: bool,
}

/// Emitted when a round's countdown reaches zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundExhausted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The round that ran out of time.
    pub round: u32,
    /// Whether it was the last round.
    pub final_round: bool,
}

impl RoundExhausted {
    /// Announcement for participants when time runs out.
    #[must_use]
    pub fn message(&self) -> &'static str {
        if self.final_round {
            "Final round complete! Please submit your final versions."
        } else {
            "Time is up! Teams, please prepare to pass your work to the next team."
        }
    }
}

/// Emitted when the session moves to the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundAdvanced {
    /// The session identifier.
    pub session_id: Uuid,
    /// The new current round.
    pub round: u32,
}

/// Emitted when the session steps back a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRewound {
    /// The session identifier.
    pub session_id: Uuid,
    /// The new current round.
    pub round: u32,
}

/// Emitted when round length or count changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingChanged {
    /// The session identifier.
    pub session_id: Uuid,
    /// Round length in seconds.
    pub time_per_round: u32,
    /// Number of rounds.
    pub total_rounds: u32,
}

/// Emitted when a team's work is recorded (first version or overwrite).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecorded {
    /// The session identifier.
    pub session_id: Uuid,
    /// Round the work belongs to.
    pub round: u32,
    /// Submitting team.
    pub team_id: TeamId,
}

/// Emitted when the roster changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterChanged {
    /// The session identifier.
    pub session_id: Uuid,
    /// Team ids in the new rotation order.
    pub team_ids: Vec<TeamId>,
}

/// Emitted when a challenge is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSelected {
    /// The session identifier.
    pub session_id: Uuid,
    /// Title of the selected challenge.
    pub title: String,
}

/// Event type identifier for [`RoundStarted`].
pub const ROUND_STARTED_EVENT_TYPE: &str = "session.round_started";

/// Event type identifier for [`RoundPaused`].
pub const ROUND_PAUSED_EVENT_TYPE: &str = "session.round_paused";

/// Event type identifier for [`RoundResumed`].
pub const ROUND_RESUMED_EVENT_TYPE: &str = "session.round_resumed";

/// Event type identifier for [`RoundEnded`].
pub const ROUND_ENDED_EVENT_TYPE: &str = "session.round_ended";

/// Event type identifier for [`RoundExhausted`].
pub const ROUND_EXHAUSTED_EVENT_TYPE: &str = "session.round_exhausted";

/// Event type identifier for [`RoundAdvanced`].
pub const ROUND_ADVANCED_EVENT_TYPE: &str = "session.round_advanced";

/// Event type identifier for [`RoundRewound`].
pub const ROUND_REWOUND_EVENT_TYPE: &str = "session.round_rewound";

/// Event type identifier for [`TimingChanged`].
pub const TIMING_CHANGED_EVENT_TYPE: &str = "session.timing_changed";

/// Event type identifier for [`SubmissionRecorded`].
pub const SUBMISSION_RECORDED_EVENT_TYPE: &str = "session.submission_recorded";

/// Event type identifier for [`RosterChanged`].
pub const ROSTER_CHANGED_EVENT_TYPE: &str = "session.roster_changed";

/// Event type identifier for [`ChallengeSelected`].
pub const CHALLENGE_SELECTED_EVENT_TYPE: &str = "session.challenge_selected";

/// Event payload variants for relay sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// A round's countdown started.
    RoundStarted(RoundStarted),
    /// A round was paused.
    RoundPaused(RoundPaused),
    /// A round was resumed.
    RoundResumed(RoundResumed),
    /// A round was ended by command.
    RoundEnded(RoundEnded),
    /// A round ran out of time.
    RoundExhausted(RoundExhausted),
    /// The session moved to the next round.
    RoundAdvanced(RoundAdvanced),
    /// The session stepped back a round.
    RoundRewound(RoundRewound),
    /// Round timing changed.
    TimingChanged(TimingChanged),
    /// A submission was recorded.
    SubmissionRecorded(SubmissionRecorded),
    /// The roster changed.
    RosterChanged(RosterChanged),
    /// A challenge was selected.
    ChallengeSelected(ChallengeSelected),
}

impl SessionEventKind {
    /// Event type identifier for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RoundStarted(_) => ROUND_STARTED_EVENT_TYPE,
            Self::RoundPaused(_) => ROUND_PAUSED_EVENT_TYPE,
            Self::RoundResumed(_) => ROUND_RESUMED_EVENT_TYPE,
            Self::RoundEnded(_) => ROUND_ENDED_EVENT_TYPE,
            Self::RoundExhausted(_) => ROUND_EXHAUSTED_EVENT_TYPE,
            Self::RoundAdvanced(_) => ROUND_ADVANCED_EVENT_TYPE,
            Self::RoundRewound(_) => ROUND_REWOUND_EVENT_TYPE,
            Self::TimingChanged(_) => TIMING_CHANGED_EVENT_TYPE,
            Self::SubmissionRecorded(_) => SUBMISSION_RECORDED_EVENT_TYPE,
            Self::RosterChanged(_) => ROSTER_CHANGED_EVENT_TYPE,
            Self::ChallengeSelected(_) => CHALLENGE_SELECTED_EVENT_TYPE,
        }
    }
}

/// Domain event envelope for relay sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: SessionEventKind,
}

impl DomainEvent for SessionEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("SessionEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
