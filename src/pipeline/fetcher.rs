//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the pipeline, including:
//! - Building the shared HTTP client with the configured user agent
//! - Single GET attempts with status classification
//! - Sequential retry of failed attempts

use crate::config::FetchConfig;
use crate::url::parse_target;
use crate::UrlError;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Whether another attempt could succeed
    ///
    /// A URL that does not parse fails the same way every time.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }
}

/// How many attempts a fetch gets and how long to pause between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy; `max_retries` of 0 still allows one attempt
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_retries.max(1),
            delay,
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Result of a fetch with retries
#[derive(Debug)]
pub struct FetchResult {
    /// The URL exactly as requested
    pub url: String,

    /// Attempts made, between 1 and the policy maximum
    pub attempts: u32,

    /// One message per failed attempt, in order; each was also logged at warn
    pub failed_attempts: Vec<String>,

    /// Body of the first successful attempt, or the last error
    pub outcome: Result<Vec<u8>, FetchError>,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetch configuration (user agent and timeouts)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use harvest::config::FetchConfig;
/// use harvest::pipeline::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs a single GET and returns the raw body
///
/// Any non-2xx status is a failed attempt.
pub async fn fetch_url(client: &Client, url: &str) -> Result<Vec<u8>, FetchError> {
    let target = parse_target(url)?;

    let response = client.get(target).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    Ok(body.to_vec())
}

/// Fetches a URL, retrying failed attempts sequentially
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return body immediately |
/// | Non-2xx status | Retry until attempts are exhausted |
/// | Network / timeout error | Retry until attempts are exhausted |
/// | Unparseable or non-HTTP URL | Fail immediately |
///
/// Every failed attempt is logged at warn level with its attempt number.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `policy` - Attempt limit and inter-attempt delay
///
/// # Returns
///
/// A FetchResult carrying the body or the last observed error
pub async fn fetch_with_retry(client: &Client, url: &str, policy: &RetryPolicy) -> FetchResult {
    let mut failed_attempts = Vec::new();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match fetch_url(client, url).await {
            Ok(body) => {
                tracing::debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                return FetchResult {
                    url: url.to_string(),
                    attempts: attempt,
                    failed_attempts,
                    outcome: Ok(body),
                };
            }
            Err(e) => {
                tracing::warn!("Retry {} for {} failed: {}", attempt, url, e);
                failed_attempts.push(e.to_string());

                if !e.is_retryable() || attempt >= policy.max_attempts {
                    return FetchResult {
                        url: url.to_string(),
                        attempts: attempt,
                        failed_attempts,
                        outcome: Err(e),
                    };
                }

                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
}
