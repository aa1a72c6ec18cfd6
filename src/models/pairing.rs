//! Pairing model — a scheduled game between two players in a round.

use serde::{Deserialize, Serialize};

use super::{DivisionId, EntityId, PairingId, PlayerId};

/// Which side of a pairing a player sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player1,
    Player2,
}

/// A single pairing between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    /// Unique identifier
    pub id: PairingId,

    /// Round number, starting at 1
    pub round: u32,

    /// Table number
    #[serde(default)]
    pub table: u32,

    pub player1: PlayerId,

    pub player2: PlayerId,

    /// Player who moves first, when assigned
    #[serde(default)]
    pub first_move: Option<PlayerId>,
}

impl Pairing {
    /// Create a pairing with an id derived from division, round and table.
    pub fn new(
        division_id: &DivisionId,
        round: u32,
        table: u32,
        player1: PlayerId,
        player2: PlayerId,
    ) -> Self {
        let id = EntityId::generate(&[
            "pairing",
            division_id.as_str(),
            &round.to_string(),
            &table.to_string(),
        ]);

        Self {
            id,
            round,
            table,
            player1,
            player2,
            first_move: None,
        }
    }

    pub fn with_first_move(mut self, player: PlayerId) -> Self {
        self.first_move = Some(player);
        self
    }

    /// Side the given player occupies, or `None` if not in this pairing.
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        if &self.player1 == player {
            Some(Side::Player1)
        } else if &self.player2 == player {
            Some(Side::Player2)
        } else {
            None
        }
    }

    pub fn involves(&self, player: &PlayerId) -> bool {
        self.side_of(player).is_some()
    }

    /// The other player in this pairing.
    pub fn opponent_of(&self, player: &PlayerId) -> Option<&PlayerId> {
        match self.side_of(player)? {
            Side::Player1 => Some(&self.player2),
            Side::Player2 => Some(&self.player1),
        }
    }

    pub fn moves_first(&self, player: &PlayerId) -> bool {
        self.first_move.as_ref() == Some(player)
    }
}
