//! Submission ledger: each team's latest content per round.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use remix_core::error::DomainError;
use serde::Serialize;

use super::roster::TeamId;

/// A team's recorded work for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// Round the work was submitted for.
    pub round_index: u32,
    /// Submitting team.
    pub team_id: TeamId,
    /// The submitted content, as given.
    pub content: String,
    /// When this version was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Last-write-wins store keyed by `(round, team)`.
///
/// No history is kept and nothing is ever deleted.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLedger {
    rounds: BTreeMap<u32, HashMap<TeamId, Submission>>,
}

impl SubmissionLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `content` for `(round_index, team_id)`, replacing any earlier
    /// version.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` if the content is blank after
    /// trimming. The ledger is left untouched.
    pub fn record(
        &mut self,
        round_index: u32,
        team_id: &TeamId,
        content: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<&Submission, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::InvalidArgument(format!(
                "submission from team {team_id} for round {round_index} is empty"
            )));
        }

        let submission = Submission {
            round_index,
            team_id: team_id.clone(),
            content: content.to_owned(),
            recorded_at,
        };
        let round = self.rounds.entry(round_index).or_default();
        round.insert(team_id.clone(), submission);
        Ok(&round[team_id])
    }

    /// Returns the latest submission for the exact key, if any.
    #[must_use]
    pub fn get(&self, round_index: u32, team_id: &TeamId) -> Option<&Submission> {
        self.rounds.get(&round_index)?.get(team_id)
    }

    /// Total number of recorded keys.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.rounds.values().map(HashMap::len).sum()
    }

    /// Whether nothing has been recorded yet.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
