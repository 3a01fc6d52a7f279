//! The active challenge and per-round instructions.

use remix_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Rule shown for a remix round when the challenge has none for it.
pub const DEFAULT_REMIX_RULE: &str = "Add your creative twist to the previous team's idea!";

/// The creative prompt the session is working on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Short title.
    pub title: String,
    /// Full prompt text.
    #[serde(default)]
    pub description: String,
    /// One remix rule per hand-off; rule `k` applies to round `k + 1`.
    #[serde(default)]
    pub remix_rules: Vec<String>,
}

impl Challenge {
    /// Remix rule for `round`, falling back to [`DEFAULT_REMIX_RULE`].
    ///
    /// Only meaningful for rounds after the first.
    #[must_use]
    pub fn remix_rule(&self, round: u32) -> &str {
        round
            .checked_sub(1)
            .and_then(|index| self.remix_rules.get(index as usize))
            .map(String::as_str)
            .filter(|rule| !rule.trim().is_empty())
            .unwrap_or(DEFAULT_REMIX_RULE)
    }
}

/// What teams are asked to do in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundBrief {
    /// First round: come up with an initial idea.
    Brainstorm,
    /// Middle rounds: remix the inherited idea under a rule.
    Remix {
        /// The rule for this round.
        rule: String,
    },
    /// Last round: polish the inherited idea into a final version.
    Final,
}

/// Instructions for `round` of a session with `total_rounds` rounds.
///
/// # Errors
///
/// Returns `DomainError::OutOfRange` if `round >= total_rounds`.
pub fn brief_for_round(
    challenge: Option<&Challenge>,
    round: u32,
    total_rounds: u32,
) -> Result<RoundBrief, DomainError> {
    if round >= total_rounds {
        return Err(DomainError::OutOfRange(format!(
            "round {round} does not exist in a {total_rounds}-round session"
        )));
    }
    if round == 0 {
        return Ok(RoundBrief::Brainstorm);
    }
    if round + 1 == total_rounds {
        return Ok(RoundBrief::Final);
    }
    let rule = challenge.map_or(DEFAULT_REMIX_RULE, |c| c.remix_rule(round));
    Ok(RoundBrief::Remix {
        rule: rule.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> Challenge {
        Challenge {
            title: "Sustainable Cities".to_owned(),
            description: "Design a solution for urban heat islands.".to_owned(),
            remix_rules: vec![
                "Make it work for children".to_owned(),
                String::new(),
            ],
        }
    }

    #[test]
    fn test_first_round_is_brainstorm_and_last_is_final() {
        let challenge = challenge();

        assert_eq!(
            brief_for_round(Some(&challenge), 0, 4).unwrap(),
            RoundBrief::Brainstorm
        );
        assert_eq!(
            brief_for_round(Some(&challenge), 3, 4).unwrap(),
            RoundBrief::Final
        );
    }

    #[test]
    fn test_middle_round_uses_rule_for_previous_hand_off() {
        let brief = brief_for_round(Some(&challenge()), 1, 4).unwrap();

        assert_eq!(
            brief,
            RoundBrief::Remix {
                rule: "Make it work for children".to_owned(),
            }
        );
    }

    #[test]
    fn test_missing_or_blank_rule_falls_back_to_default() {
        let challenge = challenge();

        assert_eq!(challenge.remix_rule(2), DEFAULT_REMIX_RULE);
        assert_eq!(
            brief_for_round(None, 1, 4).unwrap(),
            RoundBrief::Remix {
                rule: DEFAULT_REMIX_RULE.to_owned(),
            }
        );
    }

    #[test]
    fn test_round_past_session_is_out_of_range() {
        assert!(matches!(
            brief_for_round(None, 4, 4),
            Err(DomainError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_brief_serializes_with_kind_tag() {
        let json = serde_json::to_value(RoundBrief::Remix {
            rule: "Add sound".to_owned(),
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({ "kind": "remix", "rule": "Add sound" }));
    }
}
