pub mod error;
pub mod ytdlp;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;

use crate::models::stream::{Itag, StreamDescriptor};
pub use error::ExtractError;
pub use ytdlp::YtDlpExtractor;

/// Boundary to whatever resolves a page URL into concrete streams.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn id(&self) -> &'static str;

    /// Resolves a page URL into its title and every stream the platform offers.
    async fn resolve(&self, url: &str) -> Result<VideoHandle, ExtractError>;

    /// Pulls the full content of one stream into memory.
    async fn fetch(&self, stream: &Stream) -> Result<Bytes, ExtractError>;
}

/// One stream variant as reported by the extractor.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub itag: Itag,
    pub container: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
    pub resolution_label: Option<String>,
    pub format_note: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub abr: Option<f64>,
    pub filesize: Option<u64>,
    pub filesize_approx: Option<u64>,
    pub protocol: Option<String>,
    pub url: Option<String>,
    pub http_headers: HashMap<String, String>,
}

const UNKNOWN_RESOLUTION: &str = "unknown";

fn codec_present(codec: &Option<String>) -> bool {
    // a missing codec means "unknown", only an explicit "none" rules it out
    codec.as_deref().map(|c| c != "none").unwrap_or(true)
}

impl Stream {
    pub fn has_video(&self) -> bool {
        codec_present(&self.vcodec)
    }

    pub fn has_audio(&self) -> bool {
        codec_present(&self.acodec)
    }

    /// Plain HTTP(S) download; manifests (HLS, DASH) need segment handling.
    pub fn is_direct(&self) -> bool {
        self.url.is_some()
            && self
                .protocol
                .as_deref()
                .map(|p| p == "http" || p == "https")
                .unwrap_or(true)
    }

    /// Audio and video muxed into one directly fetchable file.
    pub fn is_progressive(&self) -> bool {
        self.has_video() && self.has_audio() && self.is_direct()
    }

    /// Display label, best source first: height, yt-dlp's resolution,
    /// width, format note. Never empty.
    pub fn resolution(&self) -> String {
        if let Some(h) = self.height.filter(|h| *h > 0) {
            return format!("{}p", h);
        }

        let usable = |label: &Option<String>| {
            label
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty() && *l != "audio only" && *l != "unknown")
                .map(str::to_string)
        };

        usable(&self.resolution_label)
            .or_else(|| self.width.filter(|w| *w > 0).map(|w| format!("{}w", w)))
            .or_else(|| usable(&self.format_note))
            .unwrap_or_else(|| UNKNOWN_RESOLUTION.to_string())
    }

    pub fn mime_type(&self) -> String {
        let kind = if self.has_video() { "video" } else { "audio" };
        let container = if self.container.is_empty() {
            "mp4"
        } else {
            self.container.as_str()
        };
        format!("{}/{}", kind, container)
    }

    pub fn size_hint(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }

    pub fn descriptor(&self) -> StreamDescriptor {
        StreamDescriptor {
            itag: self.itag.clone(),
            resolution: self.resolution(),
            mime_type: self.mime_type(),
            abr: self
                .abr
                .filter(|abr| *abr > 0.0)
                .map(|abr| format!("{}kbps", abr.round() as u64)),
            filesize: self.size_hint(),
        }
    }
}

/// A resolved video: its title and the streams on offer. Scoped to one request.
#[derive(Debug, Clone)]
pub struct VideoHandle {
    pub id: String,
    pub title: String,
    pub streams: Vec<Stream>,
}

impl VideoHandle {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn progressive(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(|s| s.is_progressive())
    }

    pub fn get_by_itag(&self, itag: &Itag) -> Option<&Stream> {
        self.streams.iter().find(|s| &s.itag == itag)
    }
}

/// Accepts absolute http(s) URLs with a host; everything else is rejected
/// before it reaches the extractor process.
pub fn validate_url(raw: &str) -> Result<url::Url, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::InvalidUrl("URL is empty".to_string()));
    }

    let parsed = url::Url::parse(trimmed)
        .map_err(|e| ExtractError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ExtractError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                other
            )));
        }
    }

    if parsed.host_str().map(|h| h.is_empty()).unwrap_or(true) {
        return Err(ExtractError::InvalidUrl(format!("{} has no host", trimmed)));
    }

    Ok(parsed)
}
