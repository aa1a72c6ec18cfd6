//! Tournament and division metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DivisionId, EntityId, TournamentId};

/// A rated section of a tournament with its own roster and pairings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
}

/// A tournament listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,

    pub name: String,

    /// First day of play
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub divisions: Vec<Division>,
}

impl Tournament {
    /// Create a tournament with an id derived from name and date.
    pub fn new(name: impl Into<String>, date: Option<NaiveDate>) -> Self {
        let name = name.into();
        let date_str = date.map(|d| d.to_string()).unwrap_or_default();
        let id = EntityId::generate(&["tournament", &name, &date_str]);

        Self {
            id,
            name,
            date,
            location: None,
            divisions: Vec::new(),
        }
    }

    pub fn with_division(mut self, id: impl Into<DivisionId>, name: impl Into<String>) -> Self {
        self.divisions.push(Division {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id.as_str() == id)
    }
}
