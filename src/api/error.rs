//! Error types for discovery and asset requests.

use thiserror::Error;

use crate::selection::Level;

/// Errors that can occur while talking to the studio service.
///
/// Every variant is fatal for a run: rate limiting is absorbed by the
/// [`RetryPolicy`](super::RetryPolicy) and never surfaces here unless the
/// policy is bounded.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    ///
    /// No request timeout is configured, so stalled transfers also end here.
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status other than rate limiting.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A bounded retry policy ran out of attempts while rate limited.
    #[error("still rate limited after {attempts} attempts requesting {url}")]
    RetriesExhausted {
        /// The URL that kept returning 429.
        url: String,
        /// Attempts made, including the first.
        attempts: u32,
    },

    /// Response body was not the expected JSON shape.
    #[error("malformed response from {url}: {source}")]
    Decode {
        /// The URL whose body failed to parse.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The response had no attribute group at the level's position.
    #[error("response has no attribute group for {level}")]
    MissingAttributeGroup {
        /// The level whose group was expected.
        level: Level,
    },

    /// A fully specified selection came back without images.
    #[error("response for {selection} lists no images")]
    MissingImage {
        /// The leaf selection, rendered for the message.
        selection: String,
    },

    /// An asset path could not be joined onto the API base.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl ApiError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
