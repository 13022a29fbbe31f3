use thiserror::Error;

use crate::models::stream::Itag;

/// Failures at the extraction boundary. Every variant ends up as a 400 for
/// the caller; the split exists for logging and tests.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("yt-dlp could not be started ({path}): {source}")]
    ToolUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract video info: {0}")]
    ExtractionFailed(String),

    #[error("Unexpected extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No progressive streams available for this video")]
    NoProgressiveStreams,

    #[error("Stream {0} not found")]
    StreamNotFound(Itag),

    #[error("Stream {0} cannot be fetched directly")]
    NotFetchable(Itag),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream responded with status {0}")]
    UpstreamStatus(u16),

    #[error("Stream is larger than the {limit} byte download limit")]
    TooLarge { limit: u64 },

    #[error("Stream returned no data")]
    EmptyStream,
}
