//! Relay rotation: who inherits whose work.
//!
//! The team at position `i` inherits the previous round's work of the team at
//! `(i - 1 + N) mod N`, so the roster forms a single ring. The ring is always
//! computed over the roster as it is now; if teams come or go between rounds,
//! the hand-offs change with them.

use remix_core::error::DomainError;

use super::ledger::{Submission, SubmissionLedger};
use super::roster::{Team, TeamId};

/// Position of the team a team at `index` inherits from in a ring of `len`.
///
/// `len` must be non-zero and `index < len`.
#[must_use]
pub fn predecessor_index(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

/// The team whose work `team_id` inherits.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if `team_id` is not in `teams`.
pub fn predecessor_of<'a>(teams: &'a [Team], team_id: &TeamId) -> Result<&'a Team, DomainError> {
    let index = teams
        .iter()
        .position(|team| &team.id == team_id)
        .ok_or_else(|| DomainError::NotFound(format!("team {team_id} is not on the roster")))?;
    Ok(&teams[predecessor_index(index, teams.len())])
}

/// Resolves the submission `team_id` should build on in `current_round`.
///
/// Round 0 has no predecessor and always resolves to `None`. Otherwise this is
/// the predecessor's submission from the previous round, or `None` if that
/// team never submitted.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if `team_id` is not in `teams`.
pub fn resolve_inherited_submission<'l>(
    teams: &[Team],
    current_round: u32,
    team_id: &TeamId,
    ledger: &'l SubmissionLedger,
) -> Result<Option<&'l Submission>, DomainError> {
    if current_round == 0 {
        return Ok(None);
    }
    let predecessor = predecessor_of(teams, team_id)?;
    Ok(ledger.get(current_round - 1, &predecessor.id))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    use super::*;
    use crate::domain::roster::{NewTeam, Roster};

    fn roster(ids: &[&str]) -> Roster {
        Roster::from_teams(
            ids.iter()
                .map(|id| NewTeam::new(*id, format!("Team {id}"), Vec::new())),
        )
        .unwrap()
    }

    fn inherited(roster: &Roster, round: u32, team: &str, ledger: &SubmissionLedger) -> Option<String> {
        resolve_inherited_submission(roster.teams(), round, &TeamId::from(team), ledger)
            .unwrap()
            .map(|s| s.content.clone())
    }

    #[test]
    fn test_round_zero_has_no_inheritance() {
        let roster = roster(&["A", "B"]);
        let mut ledger = SubmissionLedger::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        ledger.record(0, &TeamId::from("A"), "idea", now).unwrap();

        assert_eq!(inherited(&roster, 0, "B", &ledger), None);
    }

    #[test]
    fn test_unknown_team_is_not_found() {
        let roster = roster(&["A", "B"]);
        let ledger = SubmissionLedger::new();

        let result =
            resolve_inherited_submission(roster.teams(), 1, &TeamId::from("Z"), &ledger);

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_missing_predecessor_submission_resolves_to_none() {
        let roster = roster(&["A", "B"]);
        let ledger = SubmissionLedger::new();

        assert_eq!(inherited(&roster, 1, "B", &ledger), None);
    }

    #[test]
    fn test_single_team_inherits_its_own_work() {
        let roster = roster(&["solo"]);
        let mut ledger = SubmissionLedger::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        ledger.record(0, &TeamId::from("solo"), "mine", now).unwrap();

        assert_eq!(inherited(&roster, 1, "solo", &ledger).as_deref(), Some("mine"));
    }

    #[test]
    fn test_four_team_relay_wraps_and_recomputes_after_removal() {
        // Arrange
        let mut roster = roster(&["A", "B", "C", "D"]);
        let mut ledger = SubmissionLedger::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        for id in ["A", "B", "C", "D"] {
            ledger
                .record(0, &TeamId::from(id), &format!("{id}0"), now)
                .unwrap();
        }

        // Act / Assert: round 1 ring over {A, B, C, D}
        assert_eq!(inherited(&roster, 1, "B", &ledger).as_deref(), Some("A0"));
        assert_eq!(inherited(&roster, 1, "C", &ledger).as_deref(), Some("B0"));
        assert_eq!(inherited(&roster, 1, "D", &ledger).as_deref(), Some("C0"));
        assert_eq!(inherited(&roster, 1, "A", &ledger).as_deref(), Some("D0"));

        for id in ["A", "B", "C", "D"] {
            ledger
                .record(1, &TeamId::from(id), &format!("{id}1"), now)
                .unwrap();
        }
        roster.remove(&TeamId::from("C")).unwrap();

        // Round 2 ring over {A, B, D}
        assert_eq!(inherited(&roster, 2, "D", &ledger).as_deref(), Some("B1"));
        assert_eq!(inherited(&roster, 2, "A", &ledger).as_deref(), Some("D1"));
        assert_eq!(inherited(&roster, 2, "B", &ledger).as_deref(), Some("A1"));
    }

    proptest! {
        #[test]
        fn prop_predecessor_ring_is_a_single_cycle(len in 1usize..64) {
            // Every position has exactly one predecessor, and no two positions
            // share one.
            let predecessors: HashSet<usize> =
                (0..len).map(|i| predecessor_index(i, len)).collect();
            prop_assert_eq!(predecessors.len(), len);

            // Following predecessors from 0 visits every position before
            // returning to 0.
            let mut position = 0;
            for step in 1..=len {
                position = predecessor_index(position, len);
                if step < len {
                    prop_assert_ne!(position, 0);
                }
            }
            prop_assert_eq!(position, 0);
        }

        #[test]
        fn prop_each_prior_submission_is_inherited_at_most_once(
            len in 1usize..16,
            round in 1u32..8,
        ) {
            let ids: Vec<String> = (0..len).map(|i| format!("team-{i}")).collect();
            let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            let roster = roster(&id_refs);
            let mut ledger = SubmissionLedger::new();
            let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
            for id in &ids {
                ledger.record(round - 1, &TeamId::from(id.as_str()), id, now).unwrap();
            }

            let mut seen = HashSet::new();
            for id in &ids {
                let content = inherited(&roster, round, id, &ledger).unwrap();
                prop_assert!(seen.insert(content));
            }
            prop_assert_eq!(seen.len(), len);
        }
    }
}
