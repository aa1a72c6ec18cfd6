//! Data access layer.
//!
//! Supplies rosters, pairings and results for a tournament division:
//! - JSONL files under the data directory
//! - The [`TournamentSource`] trait the rest of the crate loads through
//! - Load-time consistency checks

mod check;
mod jsonl;
mod source;

pub use check::*;
pub use jsonl::*;
pub use source::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(String),

    #[error("Division not found: {tournament}/{division}")]
    DivisionNotFound {
        tournament: String,
        division: String,
    },

    #[error("Background load failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Storage layout rooted at the data directory.
///
/// ```text
/// data_dir/
///   tournaments.jsonl
///   tournaments/<tournament_id>/<division_id>/{players,pairings,results}.jsonl
/// ```
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournaments_path(&self) -> PathBuf {
        self.data_dir.join("tournaments.jsonl")
    }

    pub fn tournament_dir(&self, tournament_id: &str) -> PathBuf {
        self.data_dir.join("tournaments").join(tournament_id)
    }

    pub fn division_dir(&self, tournament_id: &str, division_id: &str) -> PathBuf {
        self.tournament_dir(tournament_id).join(division_id)
    }
}

/// Whether `id` can be used as a single directory name under the data directory.
pub fn is_safe_segment(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
