//! Retry decorator around any `HttpTransport`.

use super::{HttpResponse, HttpTransport};
use crate::retry::{classify, classify_http_status, RetryDecision, RetryPolicy, TransportError};

/// Applies a `RetryPolicy` to an inner transport.
///
/// Retryable statuses (429/500/502/503/504) and connection-level errors are
/// retried with backoff until the policy gives up; the last response or error
/// is then returned as-is. Successful and final responses return immediately.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let mut attempt = 1u32;
        loop {
            let result = self.inner.get(url);
            let (kind, hint) = match &result {
                Ok(resp) if resp.is_success() => return result,
                Ok(resp) => (classify_http_status(resp.status), resp.retry_after),
                Err(e) => (classify(e), None),
            };
            match self.policy.decide_with_hint(attempt, kind, hint) {
                RetryDecision::NoRetry => {
                    if attempt > 1 {
                        tracing::debug!(attempts = attempt, ?kind, "giving up after retries");
                    }
                    return result;
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        attempt,
                        ?kind,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}
