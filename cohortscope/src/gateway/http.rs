//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::error::GatewayError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent sent with every gateway request.
const USER_AGENT: &str = concat!("cohortscope/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP client operations.
///
/// The gateway only issues idempotent reads, so a single GET is all the
/// seam needs. Tests substitute a mock that serves canned bodies.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, GatewayError>> + Send;
}

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with the default timeout.
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| GatewayError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(GatewayError::Http(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(GatewayError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(GatewayError::Http(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock async HTTP client serving canned bodies by URL substring.
    ///
    /// Routes are matched in insertion order; the first route whose pattern
    /// occurs in the requested URL answers. Unmatched URLs get an HTTP 404.
    #[derive(Default)]
    pub struct MockAsyncHttpClient {
        routes: Vec<(String, Result<Vec<u8>, GatewayError>)>,
        requests: Mutex<Vec<String>>,
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_json(mut self, pattern: &str, body: &str) -> Self {
            self.routes
                .push((pattern.to_string(), Ok(body.as_bytes().to_vec())));
            self
        }

        pub fn with_error(mut self, pattern: &str, error: GatewayError) -> Self {
            self.routes.push((pattern.to_string(), Err(error)));
            self
        }

        /// URLs requested so far, in order.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, GatewayError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Err(GatewayError::Http(format!("HTTP 404 from {}", url))))
        }
    }

    #[tokio::test]
    async fn test_mock_async_client_success() {
        let mock = MockAsyncHttpClient::new().with_json("/health", r#"{"status":"ok"}"#);

        let result = mock.get("http://example.com/health").await;
        assert_eq!(result.unwrap(), br#"{"status":"ok"}"#.to_vec());
        assert_eq!(mock.requests(), vec!["http://example.com/health"]);
    }

    #[tokio::test]
    async fn test_mock_async_client_error() {
        let mock = MockAsyncHttpClient::new()
            .with_error("/health", GatewayError::Http("Test error".to_string()));

        assert!(mock.get("http://example.com/health").await.is_err());
        assert!(mock.get("http://example.com/unrouted").await.is_err());
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}
