//! Retry policy for rate-limited requests.
//!
//! This module provides the [`RetryPolicy`] and [`FailureType`] types for
//! classifying non-success responses and deciding whether to resend.
//!
//! # Overview
//!
//! A non-success status is classified into a [`FailureType`]:
//! - [`FailureType::RateLimited`] - HTTP 429, resent after a delay
//! - [`FailureType::Fatal`] - anything else, aborts the run
//!
//! The default policy resends rate-limited requests forever, sleeping a
//! fixed 60 seconds before each resend.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use studio_downloader_core::api::{RetryPolicy, RetryDecision, classify_status};
//!
//! let policy = RetryPolicy::default();
//! match policy.should_retry(classify_status(429), 1) {
//!     RetryDecision::Retry { delay, attempt } => {
//!         assert_eq!(delay, Duration::from_secs(60));
//!         assert_eq!(attempt, 2);
//!     }
//!     RetryDecision::DoNotRetry { reason } => panic!("unexpected: {reason}"),
//! }
//! ```

use std::time::Duration;

use tracing::{debug, instrument};

/// Default delay before resending a rate-limited request (60 seconds).
pub const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(60);

/// Default backoff multiplier (1.0 keeps the delay fixed).
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 1.0;

/// HTTP status signalling rate limiting.
const TOO_MANY_REQUESTS: u16 = 429;

/// Classification of a non-success response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Server rate limiting (HTTP 429); resent after the policy delay.
    RateLimited,

    /// Any other non-success status; never retried.
    Fatal,
}

/// Decision on whether to resend a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Resend after the specified delay.
    Retry {
        /// How long to wait before resending.
        delay: Duration,
        /// Which attempt number the resend will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },

    /// Give up on the request.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Configuration for resending rate-limited requests.
///
/// # Default Values
///
/// - `max_attempts`: unbounded
/// - `base_delay`: 60 seconds
/// - `max_delay`: 60 seconds
/// - `backoff_multiplier`: 1.0
///
/// # Delay Calculation
///
/// ```text
/// delay = min(base_delay * multiplier^(attempt - 1), max_delay)
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt); `None` is unbounded.
    max_attempts: Option<u32>,

    /// Delay before the first resend.
    base_delay: Duration,

    /// Maximum delay cap.
    max_delay: Duration,

    /// Multiplier applied each attempt.
    backoff_multiplier: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(None, DEFAULT_RATE_LIMIT_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a new retry policy with custom settings.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Maximum attempts including the initial one (`None` for unbounded, else >= 1)
    /// * `base_delay` - Delay before the first resend
    /// * `max_delay` - Maximum delay cap
    /// * `backoff_multiplier` - Multiplier for exponential increase
    #[must_use]
    pub fn new(
        max_attempts: Option<u32>,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.map(|max| max.max(1)),
            base_delay,
            max_delay: max_delay.max(base_delay),
            backoff_multiplier,
        }
    }

    /// Creates a policy that always waits `delay` between attempts.
    #[must_use]
    pub fn fixed(max_attempts: Option<u32>, delay: Duration) -> Self {
        Self::new(max_attempts, delay, delay, DEFAULT_BACKOFF_MULTIPLIER)
    }

    /// Returns the maximum number of attempts configured, `None` when unbounded.
    #[must_use]
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Returns the delay before the first resend.
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Determines whether to resend a request.
    ///
    /// # Arguments
    ///
    /// * `failure_type` - Classification of the failure
    /// * `attempt` - The attempt number that just failed (1-indexed)
    #[instrument(skip(self), fields(max_attempts = ?self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if failure_type == FailureType::Fatal {
            return RetryDecision::DoNotRetry {
                reason: "non-retryable status".to_string(),
            };
        }

        if let Some(max) = self.max_attempts
            && attempt >= max
        {
            debug!(attempt, max, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({max}) exhausted"),
            };
        }

        let delay = self.calculate_delay(attempt);

        debug!(
            attempt,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt.saturating_add(1),
        }
    }

    /// Formula: `min(base_delay * multiplier^(attempt - 1), max_delay)`
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let multiplier = f64::from(self.backoff_multiplier);

        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * multiplier.powf(exponent);

        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        Duration::from_millis(capped_ms as u64)
    }
}

/// Classifies a non-success HTTP status.
///
/// | Status | Type |
/// |--------|------|
/// | 429 | RateLimited |
/// | anything else | Fatal |
#[must_use]
pub fn classify_status(status: u16) -> FailureType {
    if status == TOO_MANY_REQUESTS {
        FailureType::RateLimited
    } else {
        FailureType::Fatal
    }
}
