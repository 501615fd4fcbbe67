//! Resilient page fetcher
//!
//! `FetchClient` turns a URL into a parsed HTML document, absorbing transient
//! network failures with bounded retry and reducing every other failure mode
//! to a logged `None`. No error ever reaches the caller, so a catalog run
//! over many providers keeps going when one page is unreachable.

use scraper::Html;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cache::ResponseCache;

use super::{HttpTransport, Response, Transport};

/// Per-request timeout for the underlying HTTP client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Additional attempts after the first when a request looks transient
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay between retry attempts, scaled by the attempt number
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Tunable fetch behavior, one set per client
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout applied to each individual request
    pub timeout: Duration,
    /// How many times a retryable failure is retried before giving up
    pub max_retries: u32,
    /// Base sleep between attempts; attempt N sleeps `retry_delay * N`
    pub retry_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Cache-backed HTTP fetcher that never raises
pub struct FetchClient {
    transport: Box<dyn Transport>,
    cache: ResponseCache,
    options: FetchOptions,
}

impl FetchClient {
    /// Creates a client backed by a real HTTP transport.
    pub fn new(cache: ResponseCache, options: FetchOptions) -> Self {
        let transport = Box::new(HttpTransport::new(options.timeout));
        Self {
            transport,
            cache,
            options,
        }
    }

    /// Creates a client with a custom transport
    ///
    /// Used by tests to script network behavior offline.
    #[allow(dead_code)]
    pub fn with_transport(
        transport: Box<dyn Transport>,
        cache: ResponseCache,
        options: FetchOptions,
    ) -> Self {
        Self {
            transport,
            cache,
            options,
        }
    }

    /// Fetches `url` and parses it into an HTML document.
    ///
    /// Returns `None` — after logging why — for non-2xx statuses, empty
    /// bodies, bodies that are not markup, exhausted retries, and hard
    /// transport errors. `description` names the page in log lines
    /// (e.g. "Anthropic pricing").
    pub async fn fetch(&self, url: &str, description: &str) -> Option<Html> {
        info!(url, "fetching {description}");

        let response = self.get_with_retry(url, description).await?;

        if !response.success() {
            warn!("HTTP {} for {description}", response.status);
            return None;
        }
        if response.body.trim().is_empty() {
            warn!("empty response body for {description}");
            return None;
        }
        // scraper's parser is error-tolerant and accepts anything, so "parse
        // failure" here means a body with no markup at all (a JSON error
        // page, a plain-text rate-limit notice).
        if !response.body.contains('<') {
            warn!("failed to parse HTML for {description}");
            return None;
        }

        Some(Html::parse_document(&response.body))
    }

    /// Performs the cache-backed GET, retrying retryable transport errors up
    /// to `max_retries` times. Exactly `max_retries + 1` attempts are made in
    /// the worst case.
    async fn get_with_retry(&self, url: &str, description: &str) -> Option<Response> {
        let mut attempt: u32 = 0;
        loop {
            match self.cache.get(self.transport.as_ref(), url).await {
                Ok(response) => return Some(response),
                Err(err) if err.is_retryable() => {
                    attempt += 1;
                    if attempt > self.options.max_retries {
                        warn!("max retries reached for {description}");
                        return None;
                    }
                    warn!(
                        "retrying {description} after error (attempt {attempt} of {}): {err}",
                        self.options.max_retries
                    );
                    tokio::time::sleep(self.options.retry_delay * attempt).await;
                }
                Err(err) => {
                    error!("failed to fetch {description}: {err}");
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{ok_response, status_response, ScriptedTransport};
    use crate::fetch::TransportError;

    /// Options with no sleep so retry tests run instantly.
    fn fast_options() -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(1),
            max_retries: 3,
            retry_delay: Duration::ZERO,
        }
    }

    fn client_with_script(
        script: Vec<Result<Response, TransportError>>,
    ) -> (FetchClient, std::sync::Arc<ScriptedTransport>) {
        let transport = std::sync::Arc::new(ScriptedTransport::new(script));
        let client = FetchClient::with_transport(
            Box::new(SharedTransport(transport.clone())),
            ResponseCache::disabled(),
            fast_options(),
        );
        (client, transport)
    }

    /// Forwarding wrapper so tests keep a handle on the scripted transport
    /// after boxing it into the client.
    struct SharedTransport(std::sync::Arc<ScriptedTransport>);

    #[async_trait::async_trait]
    impl Transport for SharedTransport {
        async fn get(&self, url: &str) -> Result<Response, TransportError> {
            self.0.get(url).await
        }
    }

    #[tokio::test]
    async fn test_all_timeouts_make_exactly_max_retries_plus_one_attempts() {
        let timeouts = (0..4)
            .map(|_| Err(TransportError::Timeout("timed out".to_string())))
            .collect();
        let (client, transport) = client_with_script(timeouts);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_none());
        assert_eq!(transport.call_count(), 4, "1 initial + 3 retries");
    }

    #[tokio::test]
    async fn test_timeout_then_success_recovers() {
        let (client, transport) = client_with_script(vec![
            Err(TransportError::Timeout("timed out".to_string())),
            Ok(ok_response("<html><body>ok</body></html>")),
        ]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_some());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_connection_failure_is_retried() {
        let (client, transport) = client_with_script(vec![
            Err(TransportError::Connect("refused".to_string())),
            Ok(ok_response("<html><body>ok</body></html>")),
        ]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_some());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_hard_transport_error_fails_without_retry() {
        let (client, transport) = client_with_script(vec![Err(TransportError::Other(
            "tls handshake failed".to_string(),
        ))]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_none());
        assert_eq!(transport.call_count(), 1, "Hard errors must not retry");
    }

    #[tokio::test]
    async fn test_non_2xx_returns_none_without_retry() {
        let (client, transport) = client_with_script(vec![Ok(status_response(404))]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_none());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_returns_none() {
        let (client, _transport) = client_with_script(vec![Ok(ok_response("   \n  "))]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_non_html_body_returns_none() {
        let (client, _transport) =
            client_with_script(vec![Ok(ok_response(r#"{"error": "rate limited"}"#))]);

        let result = client.fetch("https://example.com", "test page").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_successful_fetch_returns_parsed_document() {
        let (client, _transport) = client_with_script(vec![Ok(ok_response(
            "<html><body><table><tr><td>Claude</td></tr></table></body></html>",
        ))]);

        let document = client
            .fetch("https://example.com", "test page")
            .await
            .expect("Should parse");
        let selector = scraper::Selector::parse("td").unwrap();
        let cell = document.select(&selector).next().expect("Should find cell");
        assert_eq!(cell.text().collect::<String>(), "Claude");
    }
}
