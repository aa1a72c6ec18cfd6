//! Derived standing rows. Never persisted; rebuilt from pairings and results.

use serde::{Deserialize, Serialize};

use super::{Outcome, Player, PlayerId};

/// One player's aggregate line in the standings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub player_id: PlayerId,

    pub name: String,

    pub rating: f64,

    pub wins: u32,

    pub losses: u32,

    pub draws: u32,

    pub games_played: u32,

    /// wins + 0.5 * draws
    pub points: f64,

    /// Sum of own scores
    pub points_for: u64,

    /// Sum of opponent scores
    pub points_against: u64,

    /// points_for - points_against
    pub spread: i64,

    /// 1-based position after sorting; 0 until ranked
    pub rank: u32,
}

impl Standing {
    /// Empty line for a player with no games counted yet.
    pub fn for_player(player: &Player) -> Self {
        Self {
            player_id: player.id.clone(),
            name: player.name.clone(),
            rating: player.rating,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
            points: 0.0,
            points_for: 0,
            points_against: 0,
            spread: 0,
            rank: 0,
        }
    }

    /// Count one game.
    pub fn record(&mut self, own: u32, opponent: u32) {
        self.points_for += u64::from(own);
        self.points_against += u64::from(opponent);
        self.games_played += 1;

        match Outcome::from_scores(own, opponent) {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }

        self.points = f64::from(self.wins) + 0.5 * f64::from(self.draws);
        self.spread = self.points_for as i64 - self.points_against as i64;
    }

    /// Record formatted as `W-L` or `W-L-D` when draws exist.
    pub fn record_string(&self) -> String {
        if self.draws > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.draws)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}
