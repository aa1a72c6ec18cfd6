//! Round pairing views.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::{GameResult, Pairing, PairingId, Player, PlayerId};

/// One side of a pairing as shown on the pairings board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    pub player_id: PlayerId,
    pub name: String,
    pub first_move: bool,
    /// Recorded score, `None` until a result is in
    pub score: Option<u32>,
}

/// A pairing joined with names and its result, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingView {
    pub pairing_id: PairingId,
    pub round: u32,
    pub table: u32,
    pub player1: Seat,
    pub player2: Seat,
    pub completed: bool,
}

/// Distinct rounds that have pairings, ascending.
pub fn rounds(pairings: &[Pairing]) -> Vec<u32> {
    pairings
        .iter()
        .map(|p| p.round)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Pairings for `round`, ordered by table.
pub fn round_pairings(
    round: u32,
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
) -> Vec<PairingView> {
    let names: HashMap<&PlayerId, &str> =
        players.iter().map(|p| (&p.id, p.name.as_str())).collect();

    let mut by_pairing: HashMap<&PairingId, &GameResult> = HashMap::new();
    for result in results {
        by_pairing.entry(&result.pairing_id).or_insert(result);
    }

    let seat = |pairing: &Pairing, player: &PlayerId, score: Option<u32>| Seat {
        player_id: player.clone(),
        name: names
            .get(player)
            .map(|n| n.to_string())
            .unwrap_or_else(|| player.to_string()),
        first_move: pairing.moves_first(player),
        score,
    };

    let mut views: Vec<PairingView> = pairings
        .iter()
        .filter(|p| p.round == round)
        .map(|pairing| {
            let result = by_pairing.get(&pairing.id);
            PairingView {
                pairing_id: pairing.id.clone(),
                round: pairing.round,
                table: pairing.table,
                player1: seat(pairing, &pairing.player1, result.map(|r| r.player1_score)),
                player2: seat(pairing, &pairing.player2, result.map(|r| r.player2_score)),
                completed: result.is_some(),
            }
        })
        .collect();

    views.sort_by_key(|v| v.table);
    views
}
