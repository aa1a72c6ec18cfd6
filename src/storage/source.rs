//! Tournament data sources.

use std::time::UNIX_EPOCH;

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::{
    check_consistency, entity_path, is_safe_segment, read_tournaments, EntityType, JsonlReader,
    StorageConfig, StorageError,
};
use crate::models::{GameResult, Pairing, Player, Tournament};

/// Everything needed to compute a division's standings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DivisionData {
    pub players: Vec<Player>,
    pub pairings: Vec<Pairing>,
    pub results: Vec<GameResult>,
}

/// Read access to tournament data.
#[async_trait]
pub trait TournamentSource: Send + Sync {
    /// Source identifier for logging.
    fn name(&self) -> &'static str;

    async fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError>;

    /// Load a division's roster, pairings and results.
    async fn load_division(
        &self,
        tournament_id: &str,
        division_id: &str,
    ) -> Result<DivisionData, StorageError>;

    /// Opaque token that changes whenever the division's data changes.
    async fn fingerprint(
        &self,
        tournament_id: &str,
        division_id: &str,
    ) -> Result<String, StorageError>;
}

/// Source backed by JSONL files in the data directory.
#[derive(Debug, Clone)]
pub struct JsonlSource {
    config: StorageConfig,
}

impl JsonlSource {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn ensure_division(&self, tournament_id: &str, division_id: &str) -> Result<(), StorageError> {
        if !is_safe_segment(tournament_id) || !self.config.tournament_dir(tournament_id).is_dir() {
            return Err(StorageError::TournamentNotFound(tournament_id.to_string()));
        }
        if !is_safe_segment(division_id)
            || !self.config.division_dir(tournament_id, division_id).is_dir()
        {
            return Err(StorageError::DivisionNotFound {
                tournament: tournament_id.to_string(),
                division: division_id.to_string(),
            });
        }
        Ok(())
    }
}

/// Read a division synchronously and log any consistency problems.
pub fn read_division(
    config: &StorageConfig,
    tournament_id: &str,
    division_id: &str,
) -> Result<DivisionData, StorageError> {
    let data = DivisionData {
        players: JsonlReader::for_entity(config, EntityType::Player, tournament_id, division_id)
            .read_all()?,
        pairings: JsonlReader::for_entity(config, EntityType::Pairing, tournament_id, division_id)
            .read_all()?,
        results: JsonlReader::for_entity(config, EntityType::Result, tournament_id, division_id)
            .read_all()?,
    };

    for issue in check_consistency(&data) {
        warn!("{}/{}: {}", tournament_id, division_id, issue);
    }

    debug!(
        "Loaded {}/{}: {} players, {} pairings, {} results",
        tournament_id,
        division_id,
        data.players.len(),
        data.pairings.len(),
        data.results.len()
    );
    Ok(data)
}

/// Display name for a division, falling back to its id when the
/// tournament index has no entry for it.
pub async fn division_name(
    source: &dyn TournamentSource,
    tournament_id: &str,
    division_id: &str,
) -> String {
    source
        .list_tournaments()
        .await
        .ok()
        .and_then(|tournaments| {
            tournaments
                .into_iter()
                .find(|t| t.id.as_str() == tournament_id)
                .and_then(|t| t.division(division_id).map(|d| d.name.clone()))
        })
        .unwrap_or_else(|| division_id.to_string())
}

#[async_trait]
impl TournamentSource for JsonlSource {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    async fn list_tournaments(&self) -> Result<Vec<Tournament>, StorageError> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || read_tournaments(&config)).await?
    }

    async fn load_division(
        &self,
        tournament_id: &str,
        division_id: &str,
    ) -> Result<DivisionData, StorageError> {
        self.ensure_division(tournament_id, division_id)?;

        let config = self.config.clone();
        let tournament_id = tournament_id.to_string();
        let division_id = division_id.to_string();
        tokio::task::spawn_blocking(move || read_division(&config, &tournament_id, &division_id))
            .await?
    }

    async fn fingerprint(
        &self,
        tournament_id: &str,
        division_id: &str,
    ) -> Result<String, StorageError> {
        if !is_safe_segment(tournament_id) || !is_safe_segment(division_id) {
            return Err(StorageError::DivisionNotFound {
                tournament: tournament_id.to_string(),
                division: division_id.to_string(),
            });
        }

        let mut hasher = Sha256::new();

        for entity in EntityType::ALL {
            let path = entity_path(&self.config, entity, tournament_id, division_id);
            hasher.update(entity.filename().as_bytes());

            match tokio::fs::metadata(&path).await {
                Ok(meta) => {
                    let modified = meta
                        .modified()?
                        .duration_since(UNIX_EPOCH)
                        .map(|d| d.as_nanos())
                        .unwrap_or_default();
                    hasher.update(meta.len().to_le_bytes());
                    hasher.update(modified.to_le_bytes());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    hasher.update(b"absent");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(hex::encode(hasher.finalize()))
    }
}
