use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;

#[derive(Debug, Serialize)]
pub struct DivisionSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub divisions: Vec<DivisionSummary>,
}

#[derive(Debug, Serialize)]
pub struct TournamentsResponse {
    pub tournaments: Vec<TournamentSummary>,
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<TournamentsResponse>, ApiError> {
    let tournaments = state
        .source
        .list_tournaments()
        .await?
        .into_iter()
        .map(|t| TournamentSummary {
            id: t.id.to_string(),
            name: t.name,
            date: t.date.map(|d| d.to_string()),
            location: t.location,
            divisions: t
                .divisions
                .into_iter()
                .map(|d| DivisionSummary {
                    id: d.id.to_string(),
                    name: d.name,
                })
                .collect(),
        })
        .collect();

    Ok(Json(TournamentsResponse { tournaments }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::testing::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_tournaments() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(seed(tmp.path()));

        let (status, json) = get_json(app, "/api/tournaments").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tournaments"][0]["id"], "spring");
        assert_eq!(json["tournaments"][0]["divisions"][0]["name"], "Division A");
        assert!(json["tournaments"][0]["date"].is_null());
    }

    #[tokio::test]
    async fn test_list_tournaments_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let state = crate::api::state::AppState::new(std::sync::Arc::new(
            crate::storage::JsonlSource::new(crate::storage::StorageConfig::new(
                tmp.path().to_path_buf(),
            )),
        ));

        let (status, json) = get_json(build_router(state), "/api/tournaments").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tournaments"].as_array().unwrap().len(), 0);
    }
}
