//! HTTP client for the discovery and asset endpoints.
//!
//! This module provides the `StudioClient` struct which owns the single
//! `reqwest` session of a run and routes every request through the retry
//! policy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::payload::DiscoveryPayload;
use super::response::AttributeResponse;
use super::retry::{FailureType, RetryDecision, RetryPolicy, classify_status};
use crate::config::StudioConfig;
use crate::selection::Selection;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Client for the studio comparison service.
///
/// Created once per run and reused for every request so the connection pool
/// and cookies carry over, like a browser session.
///
/// # Example
///
/// ```no_run
/// use studio_downloader_core::{Selection, StudioClient, StudioConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = StudioClient::new(&StudioConfig::default())?;
/// let lighting = client.discover(&Selection::new()).await?;
/// println!("{} attribute groups", lighting.attributes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StudioClient {
    client: Client,
    api_base: Url,
    discovery_url: Url,
    retry_policy: RetryPolicy,
    pacing_delay: Duration,
    rate_limit_retries: AtomicU64,
    rate_limit_wait_ms: AtomicU64,
}

impl StudioClient {
    /// Creates a client from the run configuration.
    ///
    /// No explicit timeouts are configured; the transport defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the API base or discovery path do
    /// not form a valid URL, and [`ApiError::ClientBuild`] when the HTTP
    /// client cannot be constructed.
    pub fn new(config: &StudioConfig) -> Result<Self, ApiError> {
        let api_base =
            Url::parse(&config.api_base).map_err(|_| ApiError::invalid_url(&config.api_base))?;
        let discovery_url = api_base
            .join(&config.discovery_path)
            .map_err(|_| ApiError::invalid_url(&config.discovery_path))?;

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .cookie_store(true)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        debug!(api_base = %api_base, discovery_url = %discovery_url, "created studio client");

        Ok(Self {
            client,
            api_base,
            discovery_url,
            retry_policy: config.retry_policy.clone(),
            pacing_delay: config.pacing_delay,
            rate_limit_retries: AtomicU64::new(0),
            rate_limit_wait_ms: AtomicU64::new(0),
        })
    }

    /// Asks the discovery endpoint about `selection`.
    ///
    /// Waits the pacing delay first, then POSTs the selection's payload as
    /// form field `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, any non-success status the
    /// retry policy does not absorb, or a body that is not an
    /// [`AttributeResponse`].
    #[instrument(skip(self), fields(selection = %selection))]
    pub async fn discover(&self, selection: &Selection) -> Result<AttributeResponse, ApiError> {
        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }

        let url = self.discovery_url.as_str();
        let body = DiscoveryPayload::for_selection(selection)
            .to_form_body()
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })?;

        let response = self
            .send_with_retry(url, || {
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(body.clone())
            })
            .await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(url, e))?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Absolute URL of a server-relative asset path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] when the path cannot be joined.
    pub fn asset_url(&self, path: &str) -> Result<Url, ApiError> {
        self.api_base
            .join(path)
            .map_err(|_| ApiError::invalid_url(path))
    }

    /// GETs an asset. No pacing delay applies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-success status the
    /// retry policy does not absorb.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_asset(&self, url: &Url) -> Result<Response, ApiError> {
        self.send_with_retry(url.as_str(), || self.client.get(url.clone()))
            .await
    }

    /// Number of rate-limited responses that were resent so far.
    #[must_use]
    pub fn rate_limit_retries(&self) -> u64 {
        self.rate_limit_retries.load(Ordering::SeqCst)
    }

    /// Total time spent sleeping on rate limits so far.
    #[must_use]
    pub fn rate_limit_wait(&self) -> Duration {
        Duration::from_millis(self.rate_limit_wait_ms.load(Ordering::SeqCst))
    }

    /// Sends the request built by `build`, resending an identical one while
    /// the retry policy says so.
    async fn send_with_retry<F>(&self, url: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 1;
        loop {
            let response = build()
                .send()
                .await
                .map_err(|e| ApiError::network(url, e))?;

            let status = response.status();
            if status.is_success() {
                debug!(status = status.as_u16(), attempt, "request succeeded");
                return Ok(response);
            }

            let status_code = status.as_u16();
            let failure_type = classify_status(status_code);
            match self.retry_policy.should_retry(failure_type, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next_attempt,
                } => {
                    warn!(
                        url,
                        status = status_code,
                        delay_secs = delay.as_secs_f64(),
                        "rate limited, retrying"
                    );
                    self.record_rate_limit(delay);
                    tokio::time::sleep(delay).await;
                    attempt = next_attempt;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(status = status_code, attempt, reason = %reason, "giving up on request");
                    return Err(match failure_type {
                        FailureType::RateLimited => ApiError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                        },
                        FailureType::Fatal => ApiError::http_status(url, status_code),
                    });
                }
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn record_rate_limit(&self, delay: Duration) {
        self.rate_limit_retries.fetch_add(1, Ordering::SeqCst);
        self.rate_limit_wait_ms
            .fetch_add(delay.as_millis() as u64, Ordering::SeqCst);
    }
}
