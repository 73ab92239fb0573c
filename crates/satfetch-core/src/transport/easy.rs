//! libcurl-backed transport (blocking easy interface).

use super::{HttpResponse, HttpTransport};
use crate::retry::TransportError;
use std::str;
use std::time::Duration;

const USER_AGENT: &str = concat!("satfetch/", env!("CARGO_PKG_VERSION"));

/// Blocking GET via a fresh curl easy handle per request.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    timeout: Duration,
    connect_timeout: Duration,
}

impl CurlTransport {
    /// `timeout` bounds the whole transfer of a single attempt.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(10)),
        }
    }
}

impl HttpTransport for CurlTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.useragent(USER_AGENT)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A new status line starts a new response (redirects): forget earlier headers.
                    if line.starts_with("HTTP/") {
                        headers.clear();
                    }
                    headers.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(HttpResponse {
            status,
            body,
            retry_after: parse_retry_after(&headers),
        })
    }
}

/// Extract a delta-seconds `Retry-After` value from raw header lines.
/// HTTP-date values are ignored (the policy's own backoff applies).
pub fn parse_retry_after(lines: &[String]) -> Option<Duration> {
    lines.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if !name.trim().eq_ignore_ascii_case("retry-after") {
            return None;
        }
        value.trim().parse::<u64>().ok().map(Duration::from_secs)
    })
}
