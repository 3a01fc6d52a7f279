//! Teams and their rotation order.
//!
//! The roster is supplied by the team registry and treated as read-only input
//! by the rest of the engine. Its order is the rotation order.

use std::fmt;

use remix_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Opaque team identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TeamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A team as registered, before it has a place in the rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTeam {
    /// Team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Member names, in the order they were entered.
    #[serde(default)]
    pub members: Vec<String>,
}

impl NewTeam {
    /// Convenience constructor.
    #[must_use]
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members,
        }
    }
}

/// A team on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Member names, in the order they were entered.
    pub members: Vec<String>,
    /// Position in the rotation ring.
    pub order_index: usize,
}

/// Ordered list of teams.
///
/// `order_index` values always form `0..len()`; removing a team closes the
/// gap without reordering the survivors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from teams in rotation order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a duplicate id or a blank
    /// id or name.
    pub fn from_teams(teams: impl IntoIterator<Item = NewTeam>) -> Result<Self, DomainError> {
        let mut roster = Self::new();
        for team in teams {
            roster.add(team)?;
        }
        Ok(roster)
    }

    /// Appends a team to the end of the rotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidArgument` for a duplicate id or a blank
    /// id or name.
    pub fn add(&mut self, team: NewTeam) -> Result<&Team, DomainError> {
        if team.id.as_str().trim().is_empty() {
            return Err(DomainError::InvalidArgument(
                "team id must not be blank".to_owned(),
            ));
        }
        if team.name.trim().is_empty() {
            return Err(DomainError::InvalidArgument(format!(
                "team {} must have a name",
                team.id
            )));
        }
        if self.contains(&team.id) {
            return Err(DomainError::InvalidArgument(format!(
                "team {} is already on the roster",
                team.id
            )));
        }

        let order_index = self.teams.len();
        self.teams.push(Team {
            id: team.id,
            name: team.name,
            members: team.members,
            order_index,
        });
        Ok(&self.teams[order_index])
    }

    /// Removes a team and closes the gap in the rotation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the team is not on the roster.
    pub fn remove(&mut self, team_id: &TeamId) -> Result<Team, DomainError> {
        let position = self
            .position(team_id)
            .ok_or_else(|| DomainError::NotFound(format!("team {team_id}")))?;
        let removed = self.teams.remove(position);
        for (index, team) in self.teams.iter_mut().enumerate().skip(position) {
            team.order_index = index;
        }
        Ok(removed)
    }

    /// Teams in rotation order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Looks up a team by id.
    #[must_use]
    pub fn get(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| &team.id == team_id)
    }

    /// Position of a team in the rotation.
    #[must_use]
    pub fn position(&self, team_id: &TeamId) -> Option<usize> {
        self.teams.iter().position(|team| &team.id == team_id)
    }

    /// Whether the team is on the roster.
    #[must_use]
    pub fn contains(&self, team_id: &TeamId) -> bool {
        self.position(team_id).is_some()
    }

    /// Number of teams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether the roster has no teams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team ids in rotation order.
    #[must_use]
    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|team| team.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str) -> NewTeam {
        NewTeam::new(id, format!("Team {id}"), vec![format!("{id}-member")])
    }

    #[test]
    fn test_from_teams_assigns_order_in_insertion_order() {
        let roster = Roster::from_teams(["A", "B", "C"].map(team)).unwrap();

        let order: Vec<(&str, usize)> = roster
            .teams()
            .iter()
            .map(|t| (t.id.as_str(), t.order_index))
            .collect();
        assert_eq!(order, vec![("A", 0), ("B", 1), ("C", 2)]);
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        // Arrange
        let mut roster = Roster::from_teams(["A", "B"].map(team)).unwrap();

        // Act
        let result = roster.add(team("A"));

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_name() {
        let mut roster = Roster::new();

        let result = roster.add(NewTeam::new("A", "   ", Vec::new()));

        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_remove_closes_gap_and_keeps_relative_order() {
        // Arrange
        let mut roster = Roster::from_teams(["A", "B", "C", "D"].map(team)).unwrap();

        // Act
        let removed = roster.remove(&TeamId::from("B")).unwrap();

        // Assert
        assert_eq!(removed.id.as_str(), "B");
        let order: Vec<(&str, usize)> = roster
            .teams()
            .iter()
            .map(|t| (t.id.as_str(), t.order_index))
            .collect();
        assert_eq!(order, vec![("A", 0), ("C", 1), ("D", 2)]);
    }

    #[test]
    fn test_remove_unknown_team_is_not_found() {
        let mut roster = Roster::from_teams(["A"].map(team)).unwrap();

        let result = roster.remove(&TeamId::from("Z"));

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_team_id_serializes_as_plain_string() {
        let json = serde_json::to_value(TeamId::from("team1")).unwrap();

        assert_eq!(json, serde_json::json!("team1"));
    }
}
