use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::csv_attachment;
use super::standings::DivisionPath;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{player_detail, PlayerDetail};
use crate::export::{summary_csv, summary_file_name};
use crate::models::{Player, PlayerId};

#[derive(Debug, Deserialize)]
pub struct PlayerPath {
    pub tournament: String,
    pub division: String,
    pub player: String,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub players: Vec<Player>,
}

/// Roster sorted by rating, highest first.
pub async fn list_players(
    State(state): State<AppState>,
    Path(path): Path<DivisionPath>,
) -> Result<Json<RosterResponse>, ApiError> {
    let mut players = state
        .source
        .load_division(&path.tournament, &path.division)
        .await?
        .players;
    players.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    Ok(Json(RosterResponse { players }))
}

async fn load_detail(state: &AppState, path: &PlayerPath) -> Result<PlayerDetail, ApiError> {
    let data = state
        .source
        .load_division(&path.tournament, &path.division)
        .await?;
    let player_id = PlayerId::from(path.player.as_str());

    player_detail(&player_id, &data.players, &data.pairings, &data.results)
        .ok_or_else(|| ApiError::NotFound(format!("player {}", path.player)))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(path): Path<PlayerPath>,
) -> Result<Json<PlayerDetail>, ApiError> {
    Ok(Json(load_detail(&state, &path).await?))
}

pub async fn player_summary_csv(
    State(state): State<AppState>,
    Path(path): Path<PlayerPath>,
) -> Result<Response, ApiError> {
    let detail = load_detail(&state, &path).await?;

    Ok(csv_attachment(
        &summary_file_name(&detail.standing.name),
        summary_csv(&detail.games),
    ))
}
