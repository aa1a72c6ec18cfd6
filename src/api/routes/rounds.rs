use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::standings::DivisionPath;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{round_pairings, rounds, PairingView};

#[derive(Debug, Deserialize)]
pub struct RoundPath {
    pub tournament: String,
    pub division: String,
    pub round: u32,
}

#[derive(Debug, Serialize)]
pub struct RoundSummary {
    pub round: u32,
    pub pairings: usize,
    pub completed: usize,
}

#[derive(Debug, Serialize)]
pub struct RoundsResponse {
    pub rounds: Vec<RoundSummary>,
}

pub async fn list_rounds(
    State(state): State<AppState>,
    Path(path): Path<DivisionPath>,
) -> Result<Json<RoundsResponse>, ApiError> {
    let data = state
        .source
        .load_division(&path.tournament, &path.division)
        .await?;

    let rounds = rounds(&data.pairings)
        .into_iter()
        .map(|round| {
            let views = round_pairings(round, &data.players, &data.pairings, &data.results);
            RoundSummary {
                round,
                pairings: views.len(),
                completed: views.iter().filter(|v| v.completed).count(),
            }
        })
        .collect();

    Ok(Json(RoundsResponse { rounds }))
}

#[derive(Debug, Serialize)]
pub struct RoundPairingsResponse {
    pub round: u32,
    pub pairings: Vec<PairingView>,
}

pub async fn get_round_pairings(
    State(state): State<AppState>,
    Path(path): Path<RoundPath>,
) -> Result<Json<RoundPairingsResponse>, ApiError> {
    let data = state
        .source
        .load_division(&path.tournament, &path.division)
        .await?;

    let pairings = round_pairings(path.round, &data.players, &data.pairings, &data.results);
    if pairings.is_empty() {
        return Err(ApiError::NotFound(format!("round {}", path.round)));
    }

    Ok(Json(RoundPairingsResponse {
        round: path.round,
        pairings,
    }))
}
