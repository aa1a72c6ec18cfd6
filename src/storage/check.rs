//! Consistency checks over a loaded division.
//!
//! Violations are reported, never repaired: standings stay best-effort and
//! skip whatever they cannot attribute.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::DivisionData;
use crate::models::{PairingId, PlayerId, ResultId};

/// A data problem found in a division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIssue {
    /// Both sides of the pairing are the same player
    SelfPairing { pairing_id: PairingId },

    /// Round numbers start at 1
    InvalidRound { pairing_id: PairingId },

    /// First-move player is on neither side
    InvalidFirstMove {
        pairing_id: PairingId,
        player_id: PlayerId,
    },

    /// Pairing references a player missing from the roster
    UnknownPlayer {
        pairing_id: PairingId,
        player_id: PlayerId,
    },

    /// More than one result for the same pairing
    DuplicateResult {
        pairing_id: PairingId,
        result_id: ResultId,
    },

    /// Result references a pairing that does not exist
    DanglingResult {
        result_id: ResultId,
        pairing_id: PairingId,
    },
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataIssue::SelfPairing { pairing_id } => {
                write!(f, "pairing {} pairs a player with themselves", pairing_id)
            }
            DataIssue::InvalidRound { pairing_id } => {
                write!(f, "pairing {} has round 0", pairing_id)
            }
            DataIssue::InvalidFirstMove {
                pairing_id,
                player_id,
            } => write!(
                f,
                "pairing {} gives first move to {} who is not playing",
                pairing_id, player_id
            ),
            DataIssue::UnknownPlayer {
                pairing_id,
                player_id,
            } => write!(
                f,
                "pairing {} references unknown player {}",
                pairing_id, player_id
            ),
            DataIssue::DuplicateResult {
                pairing_id,
                result_id,
            } => write!(
                f,
                "result {} is a second result for pairing {}",
                result_id, pairing_id
            ),
            DataIssue::DanglingResult {
                result_id,
                pairing_id,
            } => write!(
                f,
                "result {} references missing pairing {}",
                result_id, pairing_id
            ),
        }
    }
}

/// Find every consistency problem in `data`, in input order.
pub fn check_consistency(data: &DivisionData) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    let roster: HashSet<&PlayerId> = data.players.iter().map(|p| &p.id).collect();
    let pairing_ids: HashSet<&PairingId> = data.pairings.iter().map(|p| &p.id).collect();

    for pairing in &data.pairings {
        if pairing.player1 == pairing.player2 {
            issues.push(DataIssue::SelfPairing {
                pairing_id: pairing.id.clone(),
            });
        }
        if pairing.round == 0 {
            issues.push(DataIssue::InvalidRound {
                pairing_id: pairing.id.clone(),
            });
        }
        if let Some(first) = &pairing.first_move {
            if !pairing.involves(first) {
                issues.push(DataIssue::InvalidFirstMove {
                    pairing_id: pairing.id.clone(),
                    player_id: first.clone(),
                });
            }
        }
        for player in [&pairing.player1, &pairing.player2] {
            if !roster.contains(player) {
                issues.push(DataIssue::UnknownPlayer {
                    pairing_id: pairing.id.clone(),
                    player_id: player.clone(),
                });
            }
        }
    }

    let mut seen: HashMap<&PairingId, &ResultId> = HashMap::new();
    for result in &data.results {
        if !pairing_ids.contains(&result.pairing_id) {
            issues.push(DataIssue::DanglingResult {
                result_id: result.id.clone(),
                pairing_id: result.pairing_id.clone(),
            });
            continue;
        }
        if seen.insert(&result.pairing_id, &result.id).is_some() {
            issues.push(DataIssue::DuplicateResult {
                pairing_id: result.pairing_id.clone(),
                result_id: result.id.clone(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameResult, Pairing, Player};

    fn clean() -> DivisionData {
        let players = vec![
            Player::new("a", "Alice", 1800.0),
            Player::new("b", "Bob", 1600.0),
        ];
        let pairings = vec![
            Pairing::new(&"div".into(), 1, 1, "a".into(), "b".into()).with_first_move("a".into()),
        ];
        let results = vec![GameResult::new(pairings[0].id.clone(), 400, 350)];
        DivisionData {
            players,
            pairings,
            results,
        }
    }

    #[test]
    fn test_clean_data_has_no_issues() {
        assert!(check_consistency(&clean()).is_empty());
        assert!(check_consistency(&DivisionData::default()).is_empty());
    }

    #[test]
    fn test_pairing_issues() {
        let mut data = clean();
        let mut bad = Pairing::new(&"div".into(), 0, 2, "a".into(), "a".into());
        bad.first_move = Some("b".into());
        data.pairings.push(bad.clone());
        data.pairings
            .push(Pairing::new(&"div".into(), 2, 1, "b".into(), "zed".into()));

        let issues = check_consistency(&data);

        assert!(issues.contains(&DataIssue::SelfPairing {
            pairing_id: bad.id.clone()
        }));
        assert!(issues.contains(&DataIssue::InvalidRound {
            pairing_id: bad.id.clone()
        }));
        assert!(issues.contains(&DataIssue::InvalidFirstMove {
            pairing_id: bad.id.clone(),
            player_id: "b".into()
        }));
        assert!(issues
            .iter()
            .any(|i| matches!(i, DataIssue::UnknownPlayer { player_id, .. } if player_id.as_str() == "zed")));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_result_issues() {
        let mut data = clean();
        let pairing_id = data.pairings[0].id.clone();
        let mut second = GameResult::new(pairing_id.clone(), 1, 2);
        second.id = "second".into();
        data.results.push(second);
        data.results.push(GameResult::new("nowhere".into(), 3, 4));

        let issues = check_consistency(&data);

        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0],
            DataIssue::DuplicateResult {
                pairing_id,
                result_id: "second".into()
            }
        );
        assert!(matches!(issues[1], DataIssue::DanglingResult { .. }));
    }

    #[test]
    fn test_issue_display_and_json() {
        let issue = DataIssue::SelfPairing {
            pairing_id: "p1".into(),
        };
        assert_eq!(issue.to_string(), "pairing p1 pairs a player with themselves");

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "self_pairing");
        assert_eq!(json["pairing_id"], "p1");
    }
}
