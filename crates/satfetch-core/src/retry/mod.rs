//! Retry and backoff policy.
//!
//! This module encapsulates error classification (timeouts, throttling,
//! connection failures) and exponential backoff decisions. The policy is a
//! plain value injected into `transport::RetryingTransport`, so it can be
//! exercised without any network.

mod classify;
mod error;
mod policy;

pub use classify::{classify, classify_curl_error, classify_http_status, classify_io_error};
pub use error::TransportError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
