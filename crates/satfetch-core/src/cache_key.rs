//! Deterministic tile paths.
//!
//! A cache key maps (record id, zoom, format) to `<dir>/<id>.z<zoom>.<format>`.
//! The existence of that file is the whole resumability contract: a run skips
//! every key that is already on disk, so re-running a batch is idempotent.

use crate::record::{Record, ZoomLevel};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    path: PathBuf,
}

impl CacheKey {
    pub fn new(output_dir: &Path, record_id: u64, zoom: ZoomLevel, format: &str) -> Self {
        Self {
            path: output_dir.join(file_name(record_id, zoom, format)),
        }
    }

    pub fn for_record(output_dir: &Path, record: &Record, zoom: ZoomLevel, format: &str) -> Self {
        Self::new(output_dir, record.id(), zoom, format)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when a finished tile is already stored under this key.
    /// Temp files use a different name, so an interrupted write never counts.
    pub fn is_cached(&self) -> bool {
        self.path.is_file()
    }
}

/// `<id>.z<zoom>.<format>`, e.g. `12.z17.png`.
pub fn file_name(record_id: u64, zoom: ZoomLevel, format: &str) -> String {
    format!("{}.z{}.{}", record_id, zoom, format)
}

/// Cached vs missing tile counts for a record set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatus {
    pub cached: usize,
    pub missing: usize,
}

impl CacheStatus {
    /// Checks every (record, zoom) key on disk. No network access.
    pub fn scan(output_dir: &Path, records: &[Record], zooms: &[ZoomLevel], format: &str) -> Self {
        let mut status = Self::default();
        for record in records {
            for &zoom in zooms {
                if CacheKey::for_record(output_dir, record, zoom, format).is_cached() {
                    status.cached += 1;
                } else {
                    status.missing += 1;
                }
            }
        }
        status
    }

    pub fn total(&self) -> usize {
        self.cached + self.missing
    }
}
