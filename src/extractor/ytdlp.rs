//! yt-dlp backed extraction.
//!
//! Metadata comes from `yt-dlp --dump-json`; stream bytes are pulled straight
//! from the media URL yt-dlp reports, with the headers it says to send.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use super::{validate_url, ExtractError, Extractor, Stream, VideoHandle};
use crate::models::stream::Itag;

// declared sizes are only a hint, don't trust them for a single allocation
const MAX_PREALLOC_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
struct RawInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    formats: Vec<RawFormat>,
    // single-format extractors put the media fields at the top level
    #[serde(flatten)]
    top: RawFormat,
}

#[derive(Debug, Default, Deserialize)]
struct RawFormat {
    format_id: Option<String>,
    ext: Option<String>,
    height: Option<u32>,
    width: Option<u32>,
    resolution: Option<String>,
    format_note: Option<String>,
    vcodec: Option<String>,
    acodec: Option<String>,
    abr: Option<f64>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
    protocol: Option<String>,
    url: Option<String>,
    #[serde(default)]
    http_headers: HashMap<String, String>,
}

impl RawFormat {
    fn into_stream(self) -> Option<Stream> {
        let itag = self.format_id.filter(|id| !id.is_empty())?;
        Some(Stream {
            itag: Itag::new(itag),
            container: self.ext.unwrap_or_default(),
            height: self.height,
            width: self.width,
            resolution_label: self.resolution,
            format_note: self.format_note,
            vcodec: self.vcodec,
            acodec: self.acodec,
            abr: self.abr,
            filesize: self.filesize.filter(|s| *s > 0.0).map(|s| s as u64),
            filesize_approx: self.filesize_approx.filter(|s| *s > 0.0).map(|s| s as u64),
            protocol: self.protocol,
            url: self.url,
            http_headers: self.http_headers,
        })
    }
}

/// Parses one `--dump-json` document into a handle.
pub fn parse_info(json: &[u8]) -> Result<VideoHandle, ExtractError> {
    let raw: RawInfo = serde_json::from_slice(json)?;

    let mut streams: Vec<Stream> = raw
        .formats
        .into_iter()
        .filter_map(RawFormat::into_stream)
        .collect();

    if streams.is_empty() {
        if let Some(stream) = raw.top.into_stream() {
            streams.push(stream);
        }
    }

    debug!("Parsed {} streams for video {}", streams.len(), raw.id);

    Ok(VideoHandle {
        id: raw.id,
        title: raw.title,
        streams,
    })
}

/// Pulls the human-readable reason out of yt-dlp's stderr.
fn extraction_message(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or("yt-dlp exited without output");
    line.trim_start_matches("ERROR:").trim().to_string()
}

fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(n), Ok(v)) => {
                map.insert(n, v);
            }
            _ => warn!("Skipping unusable header from yt-dlp: {}", name),
        }
    }
    map
}

pub struct YtDlpExtractor {
    ytdlp_path: PathBuf,
    client: reqwest::Client,
    max_download_bytes: Option<u64>,
}

impl YtDlpExtractor {
    pub fn new(
        ytdlp_path: impl Into<PathBuf>,
        max_download_bytes: Option<u64>,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            ytdlp_path: ytdlp_path.into(),
            client,
            max_download_bytes,
        })
    }

    fn check_limit(&self, size: u64) -> Result<(), ExtractError> {
        match self.max_download_bytes {
            Some(limit) if size > limit => Err(ExtractError::TooLarge { limit }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    async fn resolve(&self, url: &str) -> Result<VideoHandle, ExtractError> {
        let url = validate_url(url)?;
        debug!("Extracting video info for URL: {}", url);

        let output = Command::new(&self.ytdlp_path)
            .args(["--dump-json", "--no-warnings", "--no-playlist", "--"])
            .arg(url.as_str())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractError::ToolUnavailable {
                path: self.ytdlp_path.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("yt-dlp extraction failed: {}", stderr.trim());
            return Err(ExtractError::ExtractionFailed(extraction_message(&stderr)));
        }

        let handle = parse_info(&output.stdout)?;
        info!(
            "Resolved '{}' ({}) with {} streams",
            handle.title,
            handle.id,
            handle.streams.len()
        );
        Ok(handle)
    }

    async fn fetch(&self, stream: &Stream) -> Result<Bytes, ExtractError> {
        let url = match (&stream.url, stream.is_direct()) {
            (Some(url), true) => url,
            _ => return Err(ExtractError::NotFetchable(stream.itag.clone())),
        };

        if let Some(size) = stream.filesize {
            self.check_limit(size)?;
        }

        debug!("Fetching stream {} from {}", stream.itag, url);
        let mut response = self
            .client
            .get(url)
            .headers(header_map(&stream.http_headers))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Stream {} fetch returned {}", stream.itag, status);
            return Err(ExtractError::UpstreamStatus(status.as_u16()));
        }

        if let Some(len) = response.content_length() {
            self.check_limit(len)?;
        }

        let capacity = response
            .content_length()
            .or(stream.size_hint())
            .unwrap_or(0)
            .min(MAX_PREALLOC_BYTES);
        let mut buffer = BytesMut::with_capacity(capacity as usize);
        while let Some(chunk) = response.chunk().await? {
            self.check_limit((buffer.len() + chunk.len()) as u64)?;
            buffer.extend_from_slice(&chunk);
        }

        if buffer.is_empty() {
            return Err(ExtractError::EmptyStream);
        }

        info!("Fetched stream {} ({} bytes)", stream.itag, buffer.len());
        Ok(buffer.freeze())
    }
}
