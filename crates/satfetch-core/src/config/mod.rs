//! Configuration.
//!
//! Layers, lowest to highest: built-in defaults, `~/.config/satfetch/config.toml`
//! (created with defaults on first use), `.env` + process environment, then
//! whatever the caller overrides. `FileConfig::validate` turns the layered
//! values into a `FetchConfig`, built once at startup and passed by reference.

mod env;
mod error;
mod validate;

pub use env::{apply_env, apply_process_env};
pub use error::ConfigError;
pub use validate::{FetchConfig, TileSize};

pub mod keys {
    pub use super::env::{
        ACCESS_TOKEN, INTER_RECORD_DELAY_SECONDS, MAPBOX_API_KEY, OUTPUT_DIR,
        REQUEST_TIMEOUT_SECONDS, TILE_BASE_URL, TILE_SIZE, ZOOM_LEVELS,
    };
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Default static-map host.
pub const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Tile API credential. Never printed in full.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// First four characters followed by `…`, for diagnostics.
    pub fn redacted(&self) -> String {
        let prefix: String = self.0.chars().take(4).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", self.redacted())
    }
}

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per tile (including the first).
    pub max_attempts: u32,
    /// Delay in seconds before the first retry; doubles for each later retry.
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 1.0,
            max_delay_secs: 120,
        }
    }
}

/// Raw, layered configuration as stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Usually left unset in the file and supplied via `ACCESS_TOKEN`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,
    /// Directory tiles are written to.
    pub output_dir: PathBuf,
    /// Zoom levels fetched for every record.
    pub zoom_levels: Vec<u32>,
    /// Requested image size, `WIDTHxHEIGHT`.
    pub tile_size: String,
    /// File extension of stored tiles.
    pub image_format: String,
    /// Pause between records that hit the network.
    pub inter_record_delay_secs: f64,
    /// Total timeout for one HTTP attempt.
    pub request_timeout_secs: f64,
    /// Scheme and host of the static tile endpoint.
    pub base_url: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            output_dir: PathBuf::from("images"),
            zoom_levels: vec![16, 17, 18],
            tile_size: "224x224".to_string(),
            image_format: "png".to_string(),
            inter_record_delay_secs: 0.2,
            request_timeout_secs: 10.0,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("satfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FileConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Like `load_or_init` but at an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        let default_cfg = FileConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: FileConfig =
        toml::from_str(&data).with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(cfg)
}

/// File config plus `.env`/environment overrides. Not yet validated.
pub fn load() -> Result<FileConfig> {
    let mut cfg = load_or_init()?;
    apply_process_env(&mut cfg)?;
    Ok(cfg)
}
