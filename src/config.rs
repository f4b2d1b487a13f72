//! Run-wide configuration with production defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::RetryPolicy;
use crate::user_agent;

/// Scheme and host of the studio comparison service.
pub const DEFAULT_API_BASE: &str = "https://www.dpreview.com";

/// Path of the discovery endpoint, relative to [`DEFAULT_API_BASE`].
pub const DEFAULT_DISCOVERY_PATH: &str = "/reviews/image-comparison/get-images";

/// Root of the produced directory tree.
pub const DEFAULT_OUTPUT_ROOT: &str = "downloads/stills";

/// Delay before every discovery request.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

/// Per-tick delay of the cosmetic progress bar shown before each write.
pub const DEFAULT_PROGRESS_TICK: Duration = Duration::from_millis(10);

/// Tunables for one run.
///
/// The CLI only chooses the download cap; everything here keeps its default
/// in production. Tests point `api_base` at a mock server and zero the delays.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Scheme and host prefixed onto every server-relative asset path.
    pub api_base: String,
    /// Path of the discovery endpoint.
    pub discovery_path: String,
    /// Root directory for downloaded assets.
    pub output_root: PathBuf,
    /// Delay before every discovery request (self-imposed request pacing).
    pub pacing_delay: Duration,
    /// Retry behavior for rate-limited responses.
    pub retry_policy: RetryPolicy,
    /// Progress bar tick; zero disables the bar.
    pub progress_tick: Duration,
    /// Identifying `User-Agent` header value.
    pub user_agent: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            discovery_path: DEFAULT_DISCOVERY_PATH.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            pacing_delay: DEFAULT_PACING_DELAY,
            retry_policy: RetryPolicy::default(),
            progress_tick: DEFAULT_PROGRESS_TICK,
            user_agent: user_agent::default_user_agent().to_string(),
        }
    }
}

impl StudioConfig {
    /// Configuration for talking to a local mock of the service.
    ///
    /// All delays are zeroed and the retry delay is shortened to one millisecond.
    #[must_use]
    pub fn for_mock_server(api_base: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            api_base: api_base.into(),
            output_root: output_root.into(),
            pacing_delay: Duration::ZERO,
            retry_policy: RetryPolicy::fixed(None, Duration::from_millis(1)),
            progress_tick: Duration::ZERO,
            ..Self::default()
        }
    }
}
