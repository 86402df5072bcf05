//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the binder, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for catalog documents and page images
//! - Retry logic for transient failures
//! - Error classification

use crate::config::HttpConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// The raw fetch capability every extraction is built on
///
/// Implementations must report any non-2xx response as an error; callers
/// never receive the body of a failed request.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches a document and returns its body as text
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;

    /// Fetches a binary resource
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Retry policy applied to every request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one
    pub attempts: u32,

    /// Fixed delay between attempts
    pub delay: Duration,
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            attempts: config.retry_attempts,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use manga_binder::config::HttpConfig;
/// use manga_binder::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageSource` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Builds a client from configuration and wraps it
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?, RetryPolicy::from(config)))
    }

    /// Sends a GET request, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return response |
    /// | HTTP 429 / 5xx | Retry after the configured delay |
    /// | Other HTTP status | Fail immediately |
    /// | Timeout | Retry after the configured delay |
    /// | Connection error | Retry after the configured delay |
    /// | Other network error | Fail immediately |
    async fn get(&self, url: &Url) -> Result<Response, FetchError> {
        let mut attempt = 0;
        loop {
            match send_once(&self.client, url).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.retry.attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.retry.attempts + 1,
                        url,
                        e
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| classify(url, e))
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.get(url).await?;
        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        Ok(body.to_vec())
    }
}

/// Performs a single GET and maps non-success statuses to errors
async fn send_once(client: &Client, url: &Url) -> Result<Response, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Classifies a reqwest error
fn classify(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
