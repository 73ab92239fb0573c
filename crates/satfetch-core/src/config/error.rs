//! Configuration errors. Every variant is fatal before any fetch begins.

use crate::record::RecordError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("access token not configured: set ACCESS_TOKEN (or MAPBOX_API_KEY) in the environment or .env")]
    MissingAccessToken,
    #[error("at least one zoom level is required")]
    NoZoomLevels,
    #[error("invalid zoom level: {0}")]
    InvalidZoom(#[from] RecordError),
    #[error("invalid tile size {0:?}: expected WIDTHxHEIGHT with sides in 1..=1280")]
    InvalidTileSize(String),
    #[error("invalid image format {0:?}: expected a short alphanumeric extension")]
    InvalidFormat(String),
    #[error("invalid {key}: {value} (must be a finite, {rule} number of seconds)")]
    InvalidDuration {
        key: &'static str,
        value: f64,
        rule: &'static str,
    },
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid retry settings: {0}")]
    InvalidRetry(String),
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
