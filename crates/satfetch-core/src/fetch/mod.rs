//! Single tile fetch with cache check, retrying transport and atomic persist.
//!
//! `FetchClient::fetch` never fails the caller: every per-tile problem
//! (transport, HTTP status, disk) comes back as `FetchResult::Failed`.

mod request;

pub use request::tile_url;

use crate::cache_key::CacheKey;
use crate::config::FetchConfig;
use crate::record::{Record, ZoomLevel};
use crate::retry::TransportError;
use crate::storage;
use crate::transport::{HttpTransport, RetryingTransport};
use std::path::PathBuf;
use thiserror::Error;

/// Why a single (record, zoom) fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot build request URL from base {0}")]
    Url(String),
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("HTTP {code}")]
    Status { code: u32 },
    #[error("failed to write {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one fetch. Produced and consumed per request; never persisted.
#[derive(Debug)]
pub enum FetchResult {
    /// Tile downloaded and stored at `path`.
    Success { path: PathBuf, bytes: u64 },
    /// Tile was already on disk; no request was made.
    Skipped { path: PathBuf },
    Failed { error: FetchError },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, FetchResult::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchResult::Failed { .. })
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchResult::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// Fetches tiles for records using a transport wrapped in the configured retry policy.
pub struct FetchClient<'a, T> {
    config: &'a FetchConfig,
    transport: RetryingTransport<T>,
}

impl<'a, T: HttpTransport> FetchClient<'a, T> {
    pub fn new(config: &'a FetchConfig, transport: T) -> Self {
        Self {
            config,
            transport: RetryingTransport::new(transport, config.retry),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        self.config
    }

    pub fn cache_key(&self, record: &Record, zoom: ZoomLevel) -> CacheKey {
        CacheKey::for_record(&self.config.output_dir, record, zoom, &self.config.image_format)
    }

    /// Fetch one tile unless it is already cached.
    pub fn fetch(&self, record: &Record, zoom: ZoomLevel) -> FetchResult {
        let key = self.cache_key(record, zoom);
        if key.is_cached() {
            tracing::trace!(record = record.id(), zoom = zoom.get(), "tile cached, skipping");
            return FetchResult::Skipped {
                path: key.path().to_path_buf(),
            };
        }

        match self.download(record, zoom, &key) {
            Ok(bytes) => {
                tracing::debug!(record = record.id(), zoom = zoom.get(), bytes, "tile stored");
                FetchResult::Success {
                    path: key.path().to_path_buf(),
                    bytes,
                }
            }
            Err(error) => FetchResult::Failed { error },
        }
    }

    fn download(&self, record: &Record, zoom: ZoomLevel, key: &CacheKey) -> Result<u64, FetchError> {
        let cfg = self.config;
        let url = tile_url(&cfg.base_url, record, zoom, cfg.tile_size, &cfg.access_token)
            .ok_or_else(|| FetchError::Url(cfg.base_url.to_string()))?;

        let response = self.transport.get(url.as_str())?;
        if !response.is_success() {
            return Err(FetchError::Status {
                code: response.status,
            });
        }

        storage::write_atomic(key.path(), &response.body).map_err(|source| FetchError::Storage {
            path: key.path().to_path_buf(),
            source,
        })
    }
}
