use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, info};

use crate::{
    controllers::attachment::content_disposition,
    error::ApiError,
    extractor::{ExtractError, Extractor, Stream},
    models::stream::{DownloadRequest, VideoInfoRequest, VideoInfoResponse},
};

pub struct VideoController {
    extractor: Arc<dyn Extractor>,
}

/// A fully buffered stream on its way back to the caller as an attachment.
#[derive(Debug)]
pub struct VideoFile {
    pub title: String,
    pub data: Bytes,
}

impl IntoResponse for VideoFile {
    fn into_response(self) -> Response {
        let disposition = HeaderValue::from_str(&content_disposition(&self.title))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"video.mp4\""));
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("video/mp4")),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.data,
        )
            .into_response()
    }
}

impl VideoController {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        VideoController { extractor }
    }

    pub async fn video_info(&self, request: VideoInfoRequest) -> Result<VideoInfoResponse, ApiError> {
        debug!("video-info via {} for {}", self.extractor.id(), request.url);
        let handle = self.extractor.resolve(&request.url).await?;

        let streams: Vec<_> = handle.progressive().map(Stream::descriptor).collect();
        if streams.is_empty() {
            return Err(ExtractError::NoProgressiveStreams.into());
        }

        info!("'{}': {} progressive streams", handle.title(), streams.len());
        Ok(VideoInfoResponse { streams })
    }

    pub async fn download(&self, request: DownloadRequest) -> Result<VideoFile, ApiError> {
        debug!("download via {} for {} itag={}", self.extractor.id(), request.url, request.itag);
        let handle = self.extractor.resolve(&request.url).await?;

        let stream = handle
            .get_by_itag(&request.itag)
            .ok_or_else(|| ExtractError::StreamNotFound(request.itag.clone()))?;
        let data = self.extractor.fetch(stream).await?;

        info!("Serving '{}' itag={} ({} bytes)", handle.title(), request.itag, data.len());
        Ok(VideoFile {
            title: handle.title,
            data,
        })
    }
}
