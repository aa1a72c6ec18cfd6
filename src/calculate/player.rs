//! Per-player detail: game log and summary statistics.

use serde::Serialize;

use super::{calculate_win_rate, compute_standings, pairing_index};
use crate::models::{GameResult, Outcome, Pairing, PairingId, Player, PlayerId, Standing};

/// One game from a player's point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGame {
    pub round: u32,
    pub table: u32,
    pub pairing_id: PairingId,
    pub opponent_id: PlayerId,
    /// Opponent's display name, or their raw id when not on the roster
    pub opponent_name: String,
    pub opponent_rating: Option<f64>,
    pub score: u32,
    pub opponent_score: u32,
    pub spread: i64,
    pub outcome: Outcome,
    pub first_move: bool,
}

/// Everything the player detail view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerDetail {
    /// Row from the division standings, including rank
    pub standing: Standing,
    pub games: Vec<PlayerGame>,
    pub win_rate: f64,
    pub average_score: Option<f64>,
    pub average_opponent_score: Option<f64>,
    pub high_game: Option<u32>,
    pub low_game: Option<u32>,
    pub average_opponent_rating: Option<f64>,
    pub first_moves: u32,
}

/// Games with a recorded result for `player_id`, ordered by round then table.
///
/// Uses the same inclusion rules as the standings: results with an unknown
/// pairing, or a pairing the player is not in, are skipped.
pub fn player_games(
    player_id: &PlayerId,
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
) -> Vec<PlayerGame> {
    let index = pairing_index(pairings);

    let mut games: Vec<PlayerGame> = results
        .iter()
        .filter_map(|result| {
            let pairing = index.get(&result.pairing_id)?;
            let side = pairing.side_of(player_id)?;
            let opponent_id = pairing.opponent_of(player_id)?.clone();
            let opponent = players.iter().find(|p| p.id == opponent_id);
            let (score, opponent_score) = result.scores_for(side);

            Some(PlayerGame {
                round: pairing.round,
                table: pairing.table,
                pairing_id: pairing.id.clone(),
                opponent_name: opponent
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| opponent_id.to_string()),
                opponent_rating: opponent.map(|p| p.rating),
                opponent_id,
                score,
                opponent_score,
                spread: i64::from(score) - i64::from(opponent_score),
                outcome: Outcome::from_scores(score, opponent_score),
                first_move: pairing.moves_first(player_id),
            })
        })
        .collect();

    games.sort_by_key(|g| (g.round, g.table));
    games
}

/// Build the detail view for one player, or `None` if they are not on the roster.
pub fn player_detail(
    player_id: &PlayerId,
    players: &[Player],
    pairings: &[Pairing],
    results: &[GameResult],
) -> Option<PlayerDetail> {
    let standing = compute_standings(players, pairings, results)
        .into_iter()
        .find(|s| &s.player_id == player_id)?;
    let games = player_games(player_id, players, pairings, results);

    let scores: Vec<u32> = games.iter().map(|g| g.score).collect();
    let opponent_scores: Vec<u32> = games.iter().map(|g| g.opponent_score).collect();
    let opponent_ratings: Vec<f64> = games.iter().filter_map(|g| g.opponent_rating).collect();

    Some(PlayerDetail {
        win_rate: calculate_win_rate(standing.wins, standing.losses, standing.draws),
        average_score: mean(scores.iter().map(|&s| f64::from(s))),
        average_opponent_score: mean(opponent_scores.iter().map(|&s| f64::from(s))),
        high_game: scores.iter().copied().max(),
        low_game: scores.iter().copied().min(),
        average_opponent_rating: mean(opponent_ratings.into_iter()),
        first_moves: games.iter().filter(|g| g.first_move).count() as u32,
        standing,
        games,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}
