// config
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dev,
    Prod,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid bind address {0}")]
    InvalidAddress(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub ytdlp_path: PathBuf,
    pub max_download_bytes: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Dev,
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: PathBuf::from("static"),
            ytdlp_path: PathBuf::from("yt-dlp"),
            max_download_bytes: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let mode = match get("MODE") {
            Some(mode) if mode.to_lowercase() == "prod" => Mode::Prod,
            _ => Mode::Dev,
        };

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: "PORT",
                value: raw.clone(),
            })?,
            None => defaults.port,
        };

        let max_download_bytes = match get("MAX_DOWNLOAD_BYTES") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: "MAX_DOWNLOAD_BYTES",
                value: raw.clone(),
            })?),
            None => None,
        };

        Ok(Config {
            mode,
            host: get("HOST").unwrap_or(defaults.host),
            port,
            static_dir: get("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            ytdlp_path: get("YTDLP_PATH").map(PathBuf::from).unwrap_or(defaults.ytdlp_path),
            max_download_bytes,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    pub fn log_level(&self) -> Level {
        match self.mode {
            Mode::Dev => Level::DEBUG,
            Mode::Prod => Level::INFO,
        }
    }
}
