//! Standings calculation engine.
//!
//! Everything here is a pure function of the roster, pairings and results:
//! - Division standings with the points / spread / rating tie-break
//! - Per-player game log and summary statistics
//! - Round-by-round pairing views
//!
//! The division table and the player detail view both rank through
//! [`compute_standings`], so a player's rank is always the same in both.

mod player;
mod rounds;

pub use player::*;
pub use rounds::*;

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::models::{GameResult, Pairing, PairingId, Player, Standing};

/// Compute ranked standings for every player in `players`.
///
/// Results whose pairing cannot be found are skipped, as are results for
/// pairings the player is not part of. Outcomes come from the scores only.
/// Returns exactly one row per input player, ranked 1..=n.
pub fn compute_standings(
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
) -> Vec<Standing> {
    standings_where(players, pairings, results, |_| true)
}

/// Standings counting only games from rounds `1..=round`.
pub fn compute_standings_through_round(
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
    round: u32,
) -> Vec<Standing> {
    standings_where(players, pairings, results, |p| p.round <= round)
}

fn standings_where<F>(
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
    include: F,
) -> Vec<Standing>
where
    F: Fn(&Pairing) -> bool,
{
    let index = pairing_index(pairings);

    let mut rows: Vec<Standing> = players
        .iter()
        .map(|player| {
            let mut row = Standing::for_player(player);
            for result in results {
                let Some(pairing) = index.get(&result.pairing_id) else {
                    continue;
                };
                if !include(pairing) {
                    continue;
                }
                let Some(side) = pairing.side_of(&player.id) else {
                    continue;
                };
                let (own, opponent) = result.scores_for(side);
                row.record(own, opponent);
            }
            row
        })
        .collect();

    assign_ranks(&mut rows);
    debug!(
        "Computed standings for {} players from {} results",
        rows.len(),
        results.len()
    );
    rows
}

/// Index pairings by id. The first pairing wins if an id repeats.
pub fn pairing_index(pairings: &[Pairing]) -> HashMap<&PairingId, &Pairing> {
    let mut index = HashMap::with_capacity(pairings.len());
    for pairing in pairings {
        index.entry(&pairing.id).or_insert(pairing);
    }
    index
}

/// Ranking order: points, then spread, then rating, all descending.
pub fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.spread.cmp(&a.spread))
        .then_with(|| b.rating.total_cmp(&a.rating))
}

/// Sort and number rows. `sort_by` is stable, so full ties keep input order.
fn assign_ranks(rows: &mut [Standing]) {
    rows.sort_by(compare_standings);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }
}

/// Share of available points earned, draws counting half.
pub fn calculate_win_rate(wins: u32, losses: u32, draws: u32) -> f64 {
    let total = wins + losses + draws;
    if total == 0 {
        0.0
    } else {
        (wins as f64 + 0.5 * draws as f64) / total as f64
    }
}
