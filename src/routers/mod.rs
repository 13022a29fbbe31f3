pub mod api;
pub mod root;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use api::api_routes;
pub use root::{health_check_route, root_route};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(&state.config.static_dir);

    Router::new()
        // Frontend
        .route("/", get(root_route))
        .nest_service("/static", assets)
        .route("/health", get(health_check_route))
        // Video API
        .nest("/api", api_routes())
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extractor::fake::FakeExtractor;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    const FIRST: &str = "https://www.youtube.com/watch?v=first";
    const SECOND: &str = "https://www.youtube.com/watch?v=second";

    fn test_app() -> Router {
        let config = Config {
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
            ..Config::default()
        };
        let extractor = FakeExtractor::new()
            .with_video(FIRST, "First Video", "18", b"first-payload")
            .with_video(SECOND, "Second Video", "22", b"second-payload-longer");
        app(AppState::new(config, Arc::new(extractor)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn assert_bad_request(response: Response) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap_or_default();
        assert!(!message.is_empty(), "missing error message in {}", body);
    }

    #[tokio::test]
    async fn root_serves_html() {
        let response = test_app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("<html"));
    }

    #[tokio::test]
    async fn static_assets_are_served() {
        let response = test_app()
            .oneshot(Request::get("/static/script.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn video_info_lists_progressive_streams() {
        let response = test_app()
            .oneshot(post_json("/api/video-info", json!({ "url": FIRST })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let streams = body["streams"].as_array().unwrap();
        assert_eq!(streams.len(), 1);
        assert_eq!(streams[0]["itag"], json!(18));
        assert_eq!(streams[0]["resolution"], "360p");
        assert_eq!(streams[0]["mime_type"], "video/mp4");
        assert_eq!(streams[0]["filesize"], json!(13));
    }

    #[tokio::test]
    async fn video_info_rejects_malformed_url() {
        let response = test_app()
            .oneshot(post_json("/api/video-info", json!({ "url": "not-a-url" })))
            .await
            .unwrap();
        assert_bad_request(response).await;
    }

    #[tokio::test]
    async fn video_info_rejects_missing_url() {
        let response = test_app()
            .oneshot(post_json("/api/video-info", json!({ "link": FIRST })))
            .await
            .unwrap();
        assert_bad_request(response).await;
    }

    #[tokio::test]
    async fn video_info_rejects_non_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/video-info")
            .body(Body::from("url=whatever"))
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_bad_request(response).await;
    }

    #[tokio::test]
    async fn download_returns_attachment() {
        let app = test_app();

        let info = app
            .clone()
            .oneshot(post_json("/api/video-info", json!({ "url": FIRST })))
            .await
            .unwrap();
        let itag = json_body(info).await["streams"][0]["itag"].clone();

        let response = app
            .oneshot(post_json("/api/download", json!({ "url": FIRST, "itag": itag })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "video/mp4");
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"First Video.mp4\""));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"first-payload");
    }

    #[tokio::test]
    async fn download_accepts_string_itag() {
        let response = test_app()
            .oneshot(post_json("/api/download", json!({ "url": FIRST, "itag": "18" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn download_rejects_unknown_itag() {
        let response = test_app()
            .oneshot(post_json("/api/download", json!({ "url": FIRST, "itag": 999 })))
            .await
            .unwrap();
        assert_bad_request(response).await;
    }

    #[tokio::test]
    async fn download_rejects_missing_itag() {
        let response = test_app()
            .oneshot(post_json("/api/download", json!({ "url": FIRST })))
            .await
            .unwrap();
        assert_bad_request(response).await;
    }

    #[tokio::test]
    async fn concurrent_downloads_are_independent() {
        let app = test_app();

        let (first, second) = tokio::join!(
            app.clone()
                .oneshot(post_json("/api/download", json!({ "url": FIRST, "itag": 18 }))),
            app.clone()
                .oneshot(post_json("/api/download", json!({ "url": SECOND, "itag": 22 }))),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        let first = to_bytes(first.into_body(), usize::MAX).await.unwrap();
        let second = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&first[..], b"first-payload");
        assert_eq!(&second[..], b"second-payload-longer");
    }
}
