use std::time::Duration;

/// High-level classification of an error for retry purposes.
///
/// Callers map HTTP status codes, curl errors, or IO failures into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Transient server error that is not throttling (500, 502, 504).
    Http5xx(u16),
    /// Any other error (never retried).
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps.
///
/// Defaults: 5 attempts in total, delays of 1s, 2s, 4s, 8s between them,
/// never longer than 120s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each later one.
    pub base_delay: Duration,
    /// Upper bound on backoff delay (also caps server `Retry-After` hints).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Decide whether attempt number `attempt` (1-based) failing with `kind` gets another try.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        self.decide_with_hint(attempt, kind, None)
    }

    /// Like `decide`, but a server-provided `Retry-After` replaces the computed
    /// backoff (still capped at `max_delay`).
    pub fn decide_with_hint(
        &self,
        attempt: u32,
        kind: ErrorKind,
        retry_after: Option<Duration>,
    ) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => {
                let delay = retry_after.unwrap_or_else(|| self.backoff(attempt));
                RetryDecision::RetryAfter(delay.min(self.max_delay))
            }
        }
    }

    /// base * 2^(attempt-1), capped at `max_delay`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }
}
