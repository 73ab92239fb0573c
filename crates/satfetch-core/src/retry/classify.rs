//! Classify HTTP status, curl and I/O errors into retry policy error kinds.

use super::error::TransportError;
use super::policy::ErrorKind;
use std::io;

/// Classify an HTTP status code for retry decisions.
///
/// Only 429, 500, 502, 503 and 504 are transient; every other status is final.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500 | 502 | 504 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify an I/O error from a non-curl transport.
pub fn classify_io_error(e: &io::Error) -> ErrorKind {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::Timeout,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => ErrorKind::Connection,
        _ => ErrorKind::Other,
    }
}

/// Classify a transport error into an ErrorKind.
pub fn classify(e: &TransportError) -> ErrorKind {
    match e {
        TransportError::Curl(ce) => classify_curl_error(ce),
        TransportError::Io(ie) => classify_io_error(ie),
    }
}
