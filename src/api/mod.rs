//! REST API endpoints.
//!
//! Read-only Axum API serving tournament listings, round pairings,
//! standings and player detail as JSON, plus CSV downloads.

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TournamentNotFound(_) | StorageError::DivisionNotFound { .. } => {
                ApiError::NotFound(err.to_string())
            }
            other => {
                error!("Storage failure: {}", other);
                ApiError::Internal("failed to load tournament data".to_string())
            }
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

const DIVISION: &str = "/api/tournaments/:tournament/divisions/:division";

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = if state.cors_origin == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        match state.cors_origin.parse::<axum::http::HeaderValue>() {
            Ok(origin) => CorsLayer::new().allow_origin(origin),
            Err(_) => CorsLayer::new(),
        }
    };

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/tournaments", get(routes::tournaments::list_tournaments))
        .route(
            &format!("{DIVISION}/standings"),
            get(routes::standings::get_standings),
        )
        .route(
            &format!("{DIVISION}/standings.csv"),
            get(routes::standings::standings_csv),
        )
        .route(
            &format!("{DIVISION}/issues"),
            get(routes::standings::list_issues),
        )
        .route(
            &format!("{DIVISION}/rounds"),
            get(routes::rounds::list_rounds),
        )
        .route(
            &format!("{DIVISION}/rounds/:round/pairings"),
            get(routes::rounds::get_round_pairings),
        )
        .route(
            &format!("{DIVISION}/players"),
            get(routes::players::list_players),
        )
        .route(
            &format!("{DIVISION}/players/:player"),
            get(routes::players::get_player),
        )
        .route(
            &format!("{DIVISION}/players/:player/summary.csv"),
            get(routes::players::player_summary_csv),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_not_found_maps_to_404() {
        let err: ApiError = StorageError::TournamentNotFound("x".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_failure_is_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "secret path");
        let err: ApiError = StorageError::Io(io).into();

        assert!(matches!(err, ApiError::Internal(_)));
        assert!(!err.to_string().contains("secret path"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::BadRequest("round".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
