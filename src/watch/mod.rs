//! Live standings.
//!
//! Polls a division's data for changes and, whenever the data fingerprint
//! moves, reloads it and recomputes standings from scratch. Fresh standings
//! go out on a broadcast channel to every subscriber.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::calculate::compute_standings;
use crate::models::Standing;
use crate::storage::{StorageError, TournamentSource};

/// Errors that can occur while watching.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Which division to watch and how often.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub tournament_id: String,
    pub division_id: String,
    pub interval: Duration,
}

/// Standings published after a change.
#[derive(Debug, Clone, Serialize)]
pub struct StandingsUpdate {
    pub tournament_id: String,
    pub division_id: String,
    /// Increments on every published update, starting at 1
    pub revision: u64,
    pub computed_at: DateTime<Utc>,
    pub standings: Vec<Standing>,
}

/// Watcher bookkeeping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchState {
    pub last_checked: Option<DateTime<Utc>>,
    pub last_change: Option<DateTime<Utc>>,
    pub revision: u64,
    pub fingerprint: Option<String>,
    pub last_error: Option<String>,
}

pub struct StandingsWatcher {
    config: WatcherConfig,
    source: Arc<dyn TournamentSource>,
    sender: broadcast::Sender<StandingsUpdate>,
    state: Arc<RwLock<WatchState>>,
    cancel_token: Arc<RwLock<bool>>,
}

impl StandingsWatcher {
    pub fn new(config: WatcherConfig, source: Arc<dyn TournamentSource>) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            config,
            source,
            sender,
            state: Arc::new(RwLock::new(WatchState::default())),
            cancel_token: Arc::new(RwLock::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StandingsUpdate> {
        self.sender.subscribe()
    }

    pub async fn state(&self) -> WatchState {
        self.state.read().await.clone()
    }

    /// Stop [`run`](Self::run) after its current tick.
    pub async fn cancel(&self) {
        *self.cancel_token.write().await = true;
    }

    /// Check once. Returns the new update if the data changed.
    pub async fn check_once(&self) -> Result<Option<StandingsUpdate>, WatchError> {
        let tournament_id = &self.config.tournament_id;
        let division_id = &self.config.division_id;

        let fingerprint = self.source.fingerprint(tournament_id, division_id).await?;
        {
            let mut state = self.state.write().await;
            state.last_checked = Some(Utc::now());
            if state.fingerprint.as_deref() == Some(fingerprint.as_str()) {
                debug!("{}/{} unchanged", tournament_id, division_id);
                return Ok(None);
            }
        }

        let data = self
            .source
            .load_division(tournament_id, division_id)
            .await?;
        let standings = compute_standings(&data.players, &data.pairings, &data.results);

        let update = {
            let mut state = self.state.write().await;
            state.revision += 1;
            state.fingerprint = Some(fingerprint);
            state.last_change = Some(Utc::now());
            state.last_error = None;

            StandingsUpdate {
                tournament_id: tournament_id.clone(),
                division_id: division_id.clone(),
                revision: state.revision,
                computed_at: Utc::now(),
                standings,
            }
        };

        info!(
            "{}/{} changed, standings revision {} ({} players)",
            tournament_id,
            division_id,
            update.revision,
            update.standings.len()
        );

        if self.sender.send(update.clone()).is_err() {
            debug!("No subscribers for standings update");
        }

        Ok(Some(update))
    }

    /// Poll until cancelled.
    pub async fn run(self: Arc<Self>) {
        let mut ticker = interval(self.config.interval);

        info!(
            "Watching {}/{} every {:?} via {}",
            self.config.tournament_id,
            self.config.division_id,
            self.config.interval,
            self.source.name()
        );

        loop {
            ticker.tick().await;

            if *self.cancel_token.read().await {
                info!("Watcher stopped");
                break;
            }

            if let Err(e) = self.check_once().await {
                error!("Standings refresh failed: {}", e);
                self.state.write().await.last_error = Some(e.to_string());
            }
        }
    }
}
