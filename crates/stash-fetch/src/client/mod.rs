//! HTTP client implementation with connection pooling and retry logic

use std::time::Duration;
use reqwest::{Client, ClientBuilder, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use stash_core::error::StashError;
use crate::FetchResult;

/// Configuration for exponential backoff retry logic
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Client settings
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    pub retry: RetryConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("stash/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
        }
    }
}

/// Downloads remote files into memory
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Retry configuration
    retry_config: RetryConfig,
}

impl HttpFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> FetchResult<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with custom settings
    pub fn with_config(config: FetchConfig) -> FetchResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .timeout(config.timeout)
            .gzip(true)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| StashError::network(format!("Failed to create HTTP client: {}", e), e))?;

        Ok(Self {
            client,
            retry_config: config.retry,
        })
    }

    /// Execute an HTTP request with exponential backoff retry logic
    async fn with_retry<F, Fut, T>(&self, operation: F) -> FetchResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = FetchResult<T>>,
    {
        let mut delay = self.retry_config.initial_delay;
        let mut last_error = None;

        for attempt in 0..=self.retry_config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    let retryable = is_retryable(&error);
                    last_error = Some(error);

                    if attempt == self.retry_config.max_retries || !retryable {
                        break;
                    }

                    warn!(
                        "Attempt {} of {} failed, retrying in {:?}",
                        attempt + 1,
                        self.retry_config.max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;

                    delay = std::cmp::min(
                        Duration::from_millis(
                            (delay.as_millis() as f64 * self.retry_config.multiplier) as u64
                        ),
                        self.retry_config.max_delay
                    );
                }
            }
        }

        Err(last_error.unwrap_or_else(||
            StashError::Network {
                message: "Retry operation failed without error".to_string(),
                source: None
            }
        ))
    }

    /// Download `url` and return its body
    ///
    /// Any status other than 2xx is a `StashError::Fetch`. Client errors are
    /// returned immediately; server and transport errors are retried.
    pub async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        let parsed = parse_http_url(url)?;
        info!("Downloading {}", parsed);

        let bytes = self.with_retry(|| async {
            let response = self.client
                .get(parsed.clone())
                .send()
                .await
                .map_err(|e| StashError::network(format!("Failed to download {}: {}", url, e), e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(StashError::Fetch {
                    url: url.to_string(),
                    status: Some(status.as_u16()),
                    message: format!("server responded with {}", status),
                });
            }

            let body = response.bytes()
                .await
                .map_err(|e| StashError::network(format!("Failed to read body of {}: {}", url, e), e))?;

            Ok(body.to_vec())
        }).await?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

/// Only absolute http(s) URLs are fetched
fn parse_http_url(url: &str) -> FetchResult<Url> {
    let parsed = Url::parse(url).map_err(|e| StashError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(StashError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

fn is_retryable(error: &StashError) -> bool {
    match error {
        StashError::Network { .. } => true,
        StashError::Fetch { status: Some(status), .. } => {
            *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
        }
        _ => false,
    }
}
