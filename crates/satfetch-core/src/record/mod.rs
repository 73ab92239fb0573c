//! Geocoded input records and zoom levels.
//!
//! A `Record` is one location to fetch tiles for; its identifier doubles as
//! the cache key component, so it must be stable across runs. `ZoomLevel`
//! bounds the zoom to what the static tile endpoint serves.

mod csv;
mod error;

pub use csv::{parse_records, read_records, LAT_COLUMN, LON_COLUMN};
pub use error::{RecordError, SourceError};

use std::fmt;

/// Highest zoom level the satellite style serves.
pub const MAX_ZOOM: u8 = 22;

/// One geocoded location. Immutable once built; coordinates are validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    id: u64,
    lat: f64,
    lon: f64,
}

impl Record {
    /// Builds a record, rejecting non-finite or out-of-range coordinates.
    pub fn new(id: u64, lat: f64, lon: f64) -> Result<Self, RecordError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(RecordError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(RecordError::Longitude(lon));
        }
        Ok(Self { id, lat, lon })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Tile zoom level in `0..=MAX_ZOOM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    pub fn new(level: u32) -> Result<Self, RecordError> {
        if level > MAX_ZOOM as u32 {
            return Err(RecordError::Zoom(level));
        }
        Ok(Self(level as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sorts and de-duplicates zoom levels so every run visits them in the same order.
pub fn normalize_zoom_levels(levels: &[ZoomLevel]) -> Vec<ZoomLevel> {
    let mut out = levels.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}
