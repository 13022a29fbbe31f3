// Video lookup and download routes
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use crate::{
    controllers::VideoFile,
    error::ApiError,
    models::stream::{DownloadRequest, VideoInfoRequest, VideoInfoResponse},
    state::AppState,
};

pub async fn video_info_route(
    State(state): State<AppState>,
    payload: Result<Json<VideoInfoRequest>, JsonRejection>,
) -> Result<Json<VideoInfoResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.videos.video_info(request).await?))
}

pub async fn download_route(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<VideoFile, ApiError> {
    let Json(request) = payload?;
    state.videos.download(request).await
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/video-info", post(video_info_route))
        .route("/download", post(download_route))
}
