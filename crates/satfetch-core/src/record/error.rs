//! Record validation and record source errors.

use std::path::PathBuf;
use thiserror::Error;

/// A coordinate or zoom value outside the supported range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("zoom level {0} outside supported range 0..={max}", max = super::MAX_ZOOM)]
    Zoom(u32),
}

/// Failure to load records from an input file. All variants are fatal at startup.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("input is empty (no header row)")]
    Empty,
    #[error("input must contain columns {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("line {line}: {message}")]
    Row { line: usize, message: String },
    #[error("line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: RecordError,
    },
}
