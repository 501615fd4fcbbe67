//! HTTP transport seam
//!
//! The `Transport` trait is the only place the crate touches the network.
//! `HttpTransport` is the production implementation; tests substitute a
//! scripted one to exercise retry and caching behavior offline.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use super::Response;

/// Browser-like user agent; several provider sites serve bot traffic a stub
/// page instead of the real pricing tables.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Errors raised by a transport, split by retryability
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request exceeded the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport-level failure (TLS, redirect loop, body decode)
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts and connection failures are treated as transient and retried;
    /// everything else fails the fetch immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout(_) | TransportError::Connect(_)
        )
    }
}

/// Minimal GET-only HTTP transport
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request and returns the full response.
    async fn get(&self, url: &str) -> Result<Response, TransportError>;
}

/// reqwest-backed transport
///
/// The underlying `reqwest::Client` is built lazily on the first request and
/// reused for the lifetime of the instance.
pub struct HttpTransport {
    timeout: Duration,
    client: OnceCell<Client>,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&Client, TransportError> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| TransportError::Other(e.to_string()))
        })
    }
}

/// Maps a reqwest error onto the transport error taxonomy.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Response, TransportError> {
        let client = self.client()?;
        let response = client.get(url).send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(Response {
            status,
            body,
            headers,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport for offline tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport that replays a scripted sequence of results and counts how
    /// many times it was called. Once the script is exhausted, further calls
    /// fail with a non-retryable error.
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Result<Response, TransportError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        pub(crate) fn new(script: Vec<Result<Response, TransportError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, _url: &str) -> Result<Response, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("script lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("script exhausted".to_string())))
        }
    }

    /// A 200 response with the given body and no headers.
    pub(crate) fn ok_response(body: &str) -> Response {
        Response {
            status: 200,
            body: body.to_string(),
            headers: HashMap::new(),
        }
    }

    /// A response with the given status and an empty body.
    pub(crate) fn status_response(status: u16) -> Response {
        Response {
            status,
            body: "<html><body>error page</body></html>".to_string(),
            headers: HashMap::new(),
        }
    }
}
