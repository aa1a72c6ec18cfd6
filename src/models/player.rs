//! Player roster entry.

use serde::{Deserialize, Serialize};

use super::{DivisionId, EntityId, PlayerId};

/// A registered player in a division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Pre-event rating, used as the last ranking tie-break
    #[serde(default)]
    pub rating: f64,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating,
        }
    }

    /// Create a player whose id is derived from the division and name.
    pub fn registered(division_id: &DivisionId, name: impl Into<String>, rating: f64) -> Self {
        let name = name.into();
        let id = EntityId::generate(&["player", division_id.as_str(), &name]);
        Self { id, name, rating }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_id_depends_on_division() {
        let a = Player::registered(&"div-a".into(), "Alice", 1800.0);
        let b = Player::registered(&"div-b".into(), "Alice", 1800.0);
        let again = Player::registered(&"div-a".into(), "Alice", 1650.0);

        assert_ne!(a.id, b.id);
        assert_eq!(a.id, again.id);
    }

    #[test]
    fn test_rating_defaults_to_zero() {
        let player: Player = serde_json::from_str(r#"{"id":"p1","name":"Unrated"}"#).unwrap();
        assert_eq!(player.rating, 0.0);
        assert_eq!(player.id.as_str(), "p1");
    }
}
