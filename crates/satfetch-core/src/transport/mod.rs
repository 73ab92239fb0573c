//! HTTP transport seam.
//!
//! `HttpTransport` performs exactly one GET per call and reports whatever
//! status came back. Retrying is layered on top by `RetryingTransport`, so
//! the policy can be tested against a scripted transport with no network.

mod easy;
mod retrying;

pub use easy::{parse_retry_after, CurlTransport};
pub use retrying::RetryingTransport;

use crate::retry::TransportError;
use std::time::Duration;

/// A complete HTTP response (any status).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub body: Vec<u8>,
    /// Parsed `Retry-After` header (delta-seconds form), if present.
    pub retry_after: Option<Duration>,
}

impl HttpResponse {
    pub fn new(status: u32, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One blocking GET. Only GET is ever issued, so every request is idempotent
/// and safe to retry.
pub trait HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url)
    }
}
