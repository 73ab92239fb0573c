//! Scripted transports and helpers shared by unit tests.

use crate::retry::{RetryPolicy, TransportError};
use crate::transport::{HttpResponse, HttpTransport};
use std::sync::Mutex;
use std::time::Duration;

type Handler = Box<dyn Fn(&str, usize) -> Result<HttpResponse, TransportError> + Send + Sync>;

/// Transport whose responses come from a closure of (url, call index).
/// Records every requested URL.
pub(crate) struct ScriptedTransport {
    handler: Handler,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(f),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `statuses` in order, then 200 forever. Body is `tile-<call>`.
    pub(crate) fn statuses(statuses: &[u32]) -> Self {
        let statuses = statuses.to_vec();
        Self::from_fn(move |_, call| {
            let status = statuses.get(call).copied().unwrap_or(200);
            Ok(HttpResponse::new(status, format!("tile-{}", call)))
        })
    }

    /// Always 200 with a body naming the URL.
    pub(crate) fn ok() -> Self {
        Self::from_fn(|url, _| Ok(HttpResponse::new(200, format!("tile:{}", url))))
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl HttpTransport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.to_string());
            calls.len() - 1
        };
        (self.handler)(url, call)
    }
}

/// Default policy shape with near-zero delays so retry tests run instantly.
pub(crate) fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}
