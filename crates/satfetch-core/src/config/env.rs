//! Environment overrides (`.env` file, then process environment).

use super::error::ConfigError;
use super::{AccessToken, FileConfig};
use std::path::PathBuf;

pub const ACCESS_TOKEN: &str = "ACCESS_TOKEN";
/// Accepted as a fallback for `ACCESS_TOKEN`.
pub const MAPBOX_API_KEY: &str = "MAPBOX_API_KEY";
pub const OUTPUT_DIR: &str = "OUTPUT_DIR";
pub const ZOOM_LEVELS: &str = "ZOOM_LEVELS";
pub const TILE_SIZE: &str = "TILE_SIZE";
pub const INTER_RECORD_DELAY_SECONDS: &str = "INTER_RECORD_DELAY_SECONDS";
pub const REQUEST_TIMEOUT_SECONDS: &str = "REQUEST_TIMEOUT_SECONDS";
pub const TILE_BASE_URL: &str = "TILE_BASE_URL";

/// Loads `.env` from the working directory (if any) into the process
/// environment, then applies the recognized variables to `cfg`.
pub fn apply_process_env(cfg: &mut FileConfig) -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {}", e),
    }
    apply_env(cfg, |key| std::env::var(key).ok())
}

/// Applies recognized variables from `lookup` on top of `cfg`. Empty values are ignored.
pub fn apply_env<F>(cfg: &mut FileConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(ACCESS_TOKEN).or_else(|| get(MAPBOX_API_KEY)) {
        cfg.access_token = Some(AccessToken::new(token.trim()));
    }
    if let Some(dir) = get(OUTPUT_DIR) {
        cfg.output_dir = PathBuf::from(dir);
    }
    if let Some(raw) = get(ZOOM_LEVELS) {
        cfg.zoom_levels = parse_zoom_list(&raw).map_err(|reason| ConfigError::InvalidEnv {
            key: ZOOM_LEVELS,
            value: raw.clone(),
            reason,
        })?;
    }
    if let Some(size) = get(TILE_SIZE) {
        cfg.tile_size = size.trim().to_string();
    }
    if let Some(raw) = get(INTER_RECORD_DELAY_SECONDS) {
        cfg.inter_record_delay_secs = parse_secs(INTER_RECORD_DELAY_SECONDS, &raw)?;
    }
    if let Some(raw) = get(REQUEST_TIMEOUT_SECONDS) {
        cfg.request_timeout_secs = parse_secs(REQUEST_TIMEOUT_SECONDS, &raw)?;
    }
    if let Some(url) = get(TILE_BASE_URL) {
        cfg.base_url = url.trim().to_string();
    }
    Ok(())
}

/// Parses `16,17,18` or `[16, 17, 18]`.
fn parse_zoom_list(raw: &str) -> Result<Vec<u32>, String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(|_| format!("{:?} is not an integer", s)))
        .collect()
}

fn parse_secs(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim().parse::<f64>().map_err(|e| ConfigError::InvalidEnv {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
