use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use super::{ExtractError, Extractor, Stream, VideoHandle};
use crate::models::stream::Itag;

/// In-memory extractor for handler tests.
#[derive(Default)]
pub struct FakeExtractor {
    videos: HashMap<String, VideoHandle>,
    payloads: HashMap<String, Bytes>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a video whose progressive stream `itag` serves `payload`,
    /// alongside a video-only stream that must never be listed.
    pub fn with_video(mut self, url: &str, title: &str, itag: &str, payload: &[u8]) -> Self {
        let media_url = format!("https://media.test/{}/{}", title, itag);
        let progressive = Stream {
            itag: Itag::new(itag),
            container: "mp4".to_string(),
            height: Some(360),
            vcodec: Some("avc1.42001E".to_string()),
            acodec: Some("mp4a.40.2".to_string()),
            abr: Some(96.0),
            filesize: Some(payload.len() as u64),
            protocol: Some("https".to_string()),
            url: Some(media_url.clone()),
            ..Default::default()
        };
        let video_only = Stream {
            itag: Itag::new("137"),
            container: "mp4".to_string(),
            height: Some(1080),
            vcodec: Some("avc1.640028".to_string()),
            acodec: Some("none".to_string()),
            protocol: Some("https".to_string()),
            url: Some(format!("https://media.test/{}/137", title)),
            ..Default::default()
        };

        self.videos.insert(
            url.to_string(),
            VideoHandle {
                id: title.to_string(),
                title: title.to_string(),
                streams: vec![progressive, video_only],
            },
        );
        self.payloads.insert(media_url, Bytes::copy_from_slice(payload));
        self
    }

    /// Registers a video that only has adaptive (split) streams.
    pub fn with_adaptive_only(mut self, url: &str) -> Self {
        self.videos.insert(
            url.to_string(),
            VideoHandle {
                id: "adaptive".to_string(),
                title: "adaptive".to_string(),
                streams: vec![Stream {
                    itag: Itag::new("140"),
                    container: "m4a".to_string(),
                    vcodec: Some("none".to_string()),
                    acodec: Some("mp4a.40.2".to_string()),
                    protocol: Some("https".to_string()),
                    url: Some("https://media.test/adaptive/140".to_string()),
                    ..Default::default()
                }],
            },
        );
        self
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn resolve(&self, url: &str) -> Result<VideoHandle, ExtractError> {
        super::validate_url(url)?;
        self.videos
            .get(url)
            .cloned()
            .ok_or_else(|| ExtractError::ExtractionFailed(format!("{} is unavailable", url)))
    }

    async fn fetch(&self, stream: &Stream) -> Result<Bytes, ExtractError> {
        let url = stream
            .url
            .as_ref()
            .ok_or_else(|| ExtractError::NotFetchable(stream.itag.clone()))?;
        // yield so concurrent requests actually interleave
        tokio::task::yield_now().await;
        self.payloads
            .get(url)
            .cloned()
            .ok_or(ExtractError::UpstreamStatus(404))
    }
}
