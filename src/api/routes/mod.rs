pub mod players;
pub mod rounds;
pub mod standings;
pub mod tournaments;

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// CSV body served as a download.
pub(crate) fn csv_attachment(file_name: &str, payload: String) -> Response {
    let quoted: String = file_name
        .chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect();

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", quoted),
            ),
        ],
        payload,
    )
        .into_response()
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use crate::api::build_router;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(seed(tmp.path()));

        let (status, json) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[test]
    fn test_csv_attachment_header_is_always_valid() {
        let resp = super::csv_attachment("Ann \"Ace\"\r\nLee.csv", String::new());

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-disposition"],
            "attachment; filename=\"Ann _Ace___Lee.csv\""
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(seed(tmp.path()));

        let (status, _, _) = get(app, "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
