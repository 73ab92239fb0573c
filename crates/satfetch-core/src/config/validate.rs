//! Validated runtime configuration.

use super::error::ConfigError;
use super::{AccessToken, FileConfig, RetryConfig};
use crate::record::{normalize_zoom_levels, ZoomLevel};
use crate::retry::RetryPolicy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Largest side the static image endpoint renders.
const MAX_TILE_SIDE: u32 = 1280;

/// Requested image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for TileSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidTileSize(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        let side_ok = |v: u32| (1..=MAX_TILE_SIDE).contains(&v);
        if !side_ok(width) || !side_ok(height) {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Everything a fetch run needs, checked once at startup.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub access_token: AccessToken,
    pub output_dir: PathBuf,
    /// Sorted ascending, no duplicates.
    pub zoom_levels: Vec<ZoomLevel>,
    pub tile_size: TileSize,
    pub image_format: String,
    pub inter_record_delay: Duration,
    pub request_timeout: Duration,
    pub base_url: Url,
    pub retry: RetryPolicy,
}

impl FileConfig {
    /// Check every value and build the runtime config. A missing access token is an error here,
    /// never later during a fetch.
    pub fn validate(&self) -> Result<FetchConfig, ConfigError> {
        let access_token = match &self.access_token {
            Some(t) if !t.is_blank() => t.clone(),
            _ => return Err(ConfigError::MissingAccessToken),
        };

        if self.zoom_levels.is_empty() {
            return Err(ConfigError::NoZoomLevels);
        }
        let zooms = self
            .zoom_levels
            .iter()
            .map(|&z| ZoomLevel::new(z))
            .collect::<Result<Vec<_>, _>>()?;

        let tile_size: TileSize = self.tile_size.parse()?;

        let format = self.image_format.trim();
        if format.is_empty() || format.len() > 8 || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidFormat(self.image_format.clone()));
        }

        let inter_record_delay = secs(
            "inter_record_delay_secs",
            self.inter_record_delay_secs,
            false,
        )?;
        let request_timeout = secs("request_timeout_secs", self.request_timeout_secs, true)?;

        Ok(FetchConfig {
            access_token,
            output_dir: self.output_dir.clone(),
            zoom_levels: normalize_zoom_levels(&zooms),
            tile_size,
            image_format: format.to_ascii_lowercase(),
            inter_record_delay,
            request_timeout,
            base_url: parse_base_url(&self.base_url)?,
            retry: retry_policy(self.retry.as_ref())?,
        })
    }
}

fn secs(key: &'static str, value: f64, strictly_positive: bool) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        key,
        value,
        rule: if strictly_positive { "positive" } else { "non-negative" },
    };
    if strictly_positive && value <= 0.0 {
        return Err(invalid());
    }
    // Rejects NaN, infinities, negatives and values too large for a Duration.
    Duration::try_from_secs_f64(value).map_err(|_| invalid())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() {
        return Err(invalid("must not carry a query string"));
    }
    Ok(url)
}

fn retry_policy(cfg: Option<&RetryConfig>) -> Result<RetryPolicy, ConfigError> {
    let Some(cfg) = cfg else {
        return Ok(RetryPolicy::default());
    };
    if cfg.max_attempts == 0 {
        return Err(ConfigError::InvalidRetry("max_attempts must be at least 1".into()));
    }
    let base_delay = Duration::try_from_secs_f64(cfg.base_delay_secs).map_err(|_| {
        ConfigError::InvalidRetry(format!(
            "base_delay_secs {} must be a non-negative number of seconds",
            cfg.base_delay_secs
        ))
    })?;
    Ok(RetryPolicy {
        max_attempts: cfg.max_attempts,
        base_delay,
        max_delay: Duration::from_secs(cfg.max_delay_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token() -> FileConfig {
        FileConfig {
            access_token: Some(AccessToken::new("pk.test")),
            ..FileConfig::default()
        }
    }

    #[test]
    fn defaults_validate() {
        let cfg = with_token().validate().unwrap();
        assert_eq!(cfg.access_token.expose(), "pk.test");
        assert_eq!(
            cfg.zoom_levels.iter().map(|z| z.get()).collect::<Vec<_>>(),
            vec![16, 17, 18]
        );
        assert_eq!(cfg.tile_size, TileSize { width: 224, height: 224 });
        assert_eq!(cfg.image_format, "png");
        assert_eq!(cfg.inter_record_delay, Duration::from_millis(200));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.base_url.as_str(), "https://api.mapbox.com/");
        assert_eq!(cfg.retry, RetryPolicy::default());
    }

    #[test]
    fn missing_or_blank_token_is_fatal() {
        assert!(matches!(
            FileConfig::default().validate(),
            Err(ConfigError::MissingAccessToken)
        ));
        let blank = FileConfig {
            access_token: Some(AccessToken::new("   ")),
            ..FileConfig::default()
        };
        assert!(matches!(blank.validate(), Err(ConfigError::MissingAccessToken)));
    }

    #[test]
    fn zoom_levels_checked_and_normalized() {
        let mut cfg = with_token();
        cfg.zoom_levels = vec![];
        assert!(matches!(cfg.validate(), Err(ConfigError::NoZoomLevels)));
        cfg.zoom_levels = vec![16, 30];
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidZoom(_))));
        cfg.zoom_levels = vec![18, 16, 18];
        let v = cfg.validate().unwrap();
        assert_eq!(v.zoom_levels.iter().map(|z| z.get()).collect::<Vec<_>>(), vec![16, 18]);
    }

    #[test]
    fn tile_size_parsing() {
        assert_eq!("512x256".parse::<TileSize>().unwrap().to_string(), "512x256");
        assert_eq!("64X64".parse::<TileSize>().unwrap().width, 64);
        for bad in ["224", "0x224", "224x", "1281x10", "ax b"] {
            assert!(bad.parse::<TileSize>().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn durations_checked() {
        let mut cfg = with_token();
        cfg.request_timeout_secs = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDuration { key: "request_timeout_secs", .. })
        ));
        let mut cfg = with_token();
        cfg.inter_record_delay_secs = -1.0;
        assert!(cfg.validate().is_err());
        cfg.inter_record_delay_secs = 0.0;
        assert_eq!(cfg.validate().unwrap().inter_record_delay, Duration::ZERO);
    }

    #[test]
    fn oversized_durations_rejected_without_panic() {
        let mut cfg = with_token();
        cfg.inter_record_delay_secs = 1e20;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDuration { key: "inter_record_delay_secs", .. })
        ));

        let mut cfg = with_token();
        cfg.request_timeout_secs = 1e20;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDuration { key: "request_timeout_secs", .. })
        ));

        let mut cfg = with_token();
        for bad in [f64::NAN, f64::INFINITY] {
            cfg.request_timeout_secs = bad;
            assert!(cfg.validate().is_err(), "{} should be rejected", bad);
        }

        let mut cfg = with_token();
        cfg.retry = Some(RetryConfig {
            base_delay_secs: 1e30,
            ..RetryConfig::default()
        });
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRetry(_))));
        cfg.retry = Some(RetryConfig {
            base_delay_secs: -0.5,
            ..RetryConfig::default()
        });
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRetry(_))));
    }

    #[test]
    fn base_url_checked() {
        let mut cfg = with_token();
        for bad in ["not a url", "ftp://tiles.example", "mailto:x@y", "https://h/?q=1"] {
            cfg.base_url = bad.to_string();
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidBaseUrl { .. })),
                "{} should be rejected",
                bad
            );
        }
        cfg.base_url = "http://127.0.0.1:8080/proxy".to_string();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn image_format_checked() {
        let mut cfg = with_token();
        cfg.image_format = "../png".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidFormat(_))));
        cfg.image_format = "PNG".to_string();
        assert_eq!(cfg.validate().unwrap().image_format, "png");
    }

    #[test]
    fn retry_section_applied() {
        let mut cfg = with_token();
        cfg.retry = Some(RetryConfig {
            max_attempts: 3,
            base_delay_secs: 0.5,
            max_delay_secs: 15,
        });
        let v = cfg.validate().unwrap();
        assert_eq!(v.retry.max_attempts, 3);
        assert_eq!(v.retry.base_delay, Duration::from_millis(500));
        assert_eq!(v.retry.max_delay, Duration::from_secs(15));

        cfg.retry = Some(RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        });
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidRetry(_))));
    }
}
