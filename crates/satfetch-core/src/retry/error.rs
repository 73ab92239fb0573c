//! Transport-level error type for retry classification.

use std::fmt;

/// Error returned by a single transport attempt (no HTTP response was obtained).
/// HTTP statuses are not errors at this layer; see `transport::HttpResponse`.
#[derive(Debug)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Curl(curl::Error),
    /// I/O failure from a non-curl transport (connection reset, refused, timed out).
    Io(std::io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Curl(e) => write!(f, "{}", e),
            TransportError::Io(e) => write!(f, "io: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Curl(e) => Some(e),
            TransportError::Io(e) => Some(e),
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Curl(e)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e)
    }
}
