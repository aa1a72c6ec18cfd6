//! Recorded result of a completed pairing.

use serde::{Deserialize, Serialize};

use super::{EntityId, PairingId, PlayerId, ResultId, Side};

/// Scores for one pairing, one per side.
///
/// `winner` is carried as reported by the scorekeeper but standings never
/// consult it; outcomes are always derived from the scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub id: ResultId,

    pub pairing_id: PairingId,

    pub player1_score: u32,

    pub player2_score: u32,

    #[serde(default)]
    pub winner: Option<PlayerId>,
}

impl GameResult {
    pub fn new(pairing_id: PairingId, player1_score: u32, player2_score: u32) -> Self {
        let id = EntityId::generate(&["result", pairing_id.as_str()]);
        Self {
            id,
            pairing_id,
            player1_score,
            player2_score,
            winner: None,
        }
    }

    pub fn with_winner(mut self, winner: PlayerId) -> Self {
        self.winner = Some(winner);
        self
    }

    /// Scores as `(own, opponent)` from the given side's point of view.
    pub fn scores_for(&self, side: Side) -> (u32, u32) {
        match side {
            Side::Player1 => (self.player1_score, self.player2_score),
            Side::Player2 => (self.player2_score, self.player1_score),
        }
    }
}

/// Outcome of a game from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Classify by comparing scores.
    pub fn from_scores(own: u32, opponent: u32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Single-letter form used in exports.
    pub fn letter(&self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Loss => "L",
            Outcome::Draw => "D",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Loss => write!(f, "loss"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}
