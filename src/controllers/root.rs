use std::path::Path;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::error;

pub struct RootController;

impl RootController {
    /// Serves the frontend entry page from the static root.
    pub async fn root(static_dir: &Path) -> Response {
        let index = static_dir.join("index.html");
        match tokio::fs::read_to_string(&index).await {
            Ok(page) => Html(page).into_response(),
            Err(e) => {
                error!("Failed to read {}: {}", index.display(), e);
                (
                    StatusCode::NOT_FOUND,
                    Json(serde_json::json!({ "error": "Frontend not found" })),
                )
                    .into_response()
            }
        }
    }

    pub async fn health_check() -> Response {
        Json(serde_json::json!({ "status": "ok" })).into_response()
    }
}
