//! Static satellite tile URL construction.

use crate::config::{AccessToken, TileSize};
use crate::record::{Record, ZoomLevel};
use url::Url;

/// Path of the satellite style's static image endpoint, below the base URL.
const STATIC_PATH: [&str; 5] = ["styles", "v1", "mapbox", "satellite-v9", "static"];

/// `<base>/styles/v1/mapbox/satellite-v9/static/{lon},{lat},{zoom}/{w}x{h}?access_token={token}`.
///
/// Longitude comes first. Returns `None` only for a base URL that cannot take
/// path segments, which config validation already rules out.
pub fn tile_url(
    base: &Url,
    record: &Record,
    zoom: ZoomLevel,
    size: TileSize,
    token: &AccessToken,
) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        segments.extend(STATIC_PATH);
        segments.push(&format!("{},{},{}", record.lon(), record.lat(), zoom));
        segments.push(&size.to_string());
    }
    url.query_pairs_mut()
        .clear()
        .append_pair("access_token", token.expose());
    Some(url)
}
