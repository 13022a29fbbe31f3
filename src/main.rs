use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod controllers;
mod error;
mod extractor;
mod models;
mod routers;
mod state;

use config::Config;
use extractor::{Extractor, YtDlpExtractor};
use routers::app;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log_level().into()))
        .with_target(false)
        .init();

    info!(
        "Config loaded: mode={:?} ytdlp={} max_download_bytes={:?}",
        config.mode,
        config.ytdlp_path.display(),
        config.max_download_bytes
    );

    let extractor = YtDlpExtractor::new(&config.ytdlp_path, config.max_download_bytes)
        .context("Failed to build HTTP client")?;
    let extractor: Arc<dyn Extractor> = Arc::new(extractor);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🎬 Stream fetch listening on http://{}", addr);
    info!("📄 Frontend served from {}", config.static_dir.display());
    info!("📡 API endpoints: POST /api/video-info, POST /api/download");

    let app = app(AppState::new(config, extractor));
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
