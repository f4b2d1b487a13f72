//! Enumeration of the lighting → camera → format → ISO hierarchy.
//!
//! The [`Enumerator`] asks the discovery endpoint for the legal values of
//! each level given the parents chosen so far, visits them in API order, and
//! hands every complete selection to the [`Fetcher`].
//!
//! # Example
//!
//! ```no_run
//! use studio_downloader_core::{DownloadCap, Enumerator, StudioClient, StudioConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig::default();
//! let client = StudioClient::new(&config)?;
//! let mut cap = DownloadCap::new(5);
//! let stats = Enumerator::new(&client, &config).run(&mut cap).await?;
//! println!("{} leaves, {} files written", stats.leaves, stats.files_written);
//! # Ok(())
//! # }
//! ```

use tracing::{debug, info, instrument};

use crate::api::{ApiError, StudioClient};
use crate::config::StudioConfig;
use crate::download::{DownloadError, Fetcher, LeafReport};
use crate::selection::{Level, Selection};

/// Error type for enumeration runs. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// A discovery request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Fetching a leaf's assets failed.
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Cap on the number of leaves whose assets are fetched.
///
/// A limit of 0 means unlimited. The counter only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadCap {
    limit: u64,
    completed: u64,
}

impl DownloadCap {
    /// Creates a cap of `limit` leaves (0 = unlimited).
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            completed: 0,
        }
    }

    /// Creates a cap that is never reached.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(0)
    }

    /// The configured limit, `None` when unlimited.
    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        (self.limit > 0).then_some(self.limit)
    }

    /// Leaves recorded so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Whether a positive limit has been reached.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        self.limit().is_some_and(|limit| self.completed >= limit)
    }

    /// Records one finished leaf and returns whether the cap is now reached.
    pub fn record_leaf(&mut self) -> bool {
        self.completed = self.completed.saturating_add(1);
        self.is_reached()
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Leaf selections whose asset pair was fetched (written or skipped).
    pub leaves: u64,
    /// Files written.
    pub files_written: u64,
    /// Files skipped because they already existed.
    pub files_skipped: u64,
    /// Rate-limited responses that were resent.
    pub rate_limit_retries: u64,
    /// Whether the run stopped because the cap was reached.
    pub cap_reached: bool,
}

impl RunStats {
    fn record(&mut self, report: &LeafReport) {
        self.leaves += 1;
        self.files_written += report.written();
        self.files_skipped += report.skipped();
    }
}

/// Walks the four levels and fetches every leaf.
#[derive(Debug)]
pub struct Enumerator<'a> {
    client: &'a StudioClient,
    fetcher: Fetcher<'a>,
}

impl<'a> Enumerator<'a> {
    /// Creates an enumerator over `client`, writing under `config.output_root`.
    #[must_use]
    pub fn new(client: &'a StudioClient, config: &StudioConfig) -> Self {
        Self {
            client,
            fetcher: Fetcher::new(client, config),
        }
    }

    /// Visits every combination in API order, stopping early once `cap` is
    /// reached.
    ///
    /// # Errors
    ///
    /// Returns [`RunError`] on the first failed request or write; files
    /// already written stay on disk.
    #[instrument(skip_all, fields(limit = ?cap.limit()))]
    pub async fn run(&self, cap: &mut DownloadCap) -> Result<RunStats, RunError> {
        let mut stats = RunStats::default();
        if cap.is_reached() {
            stats.cap_reached = true;
            return Ok(self.finish(stats));
        }

        for lighting in self.children(&Selection::new()).await? {
            log_entered(&lighting);
            for camera in self.children(&lighting).await? {
                log_entered(&camera);
                for format in self.children(&camera).await? {
                    log_entered(&format);
                    for leaf in self.children(&format).await? {
                        log_entered(&leaf);
                        let report = self.fetcher.fetch_leaf(&leaf).await?;
                        stats.record(&report);

                        if cap.record_leaf() {
                            let saved = cap.completed();
                            info!(saved, "Saved {saved} images. Exiting.");
                            stats.cap_reached = true;
                            return Ok(self.finish(stats));
                        }
                    }
                }
            }
        }

        Ok(self.finish(stats))
    }

    /// Child selections of `parent`, one per value the API lists for the
    /// next level. A leaf has no children.
    async fn children(&self, parent: &Selection) -> Result<Vec<Selection>, RunError> {
        let Some(level) = parent.next_level() else {
            return Ok(Vec::new());
        };
        let response = self.client.discover(parent).await?;
        let values = response.values_for(level)?;
        debug!(level = %level, count = values.len(), "discovered values");

        Ok(parent.children(values))
    }

    fn finish(&self, mut stats: RunStats) -> RunStats {
        stats.rate_limit_retries = self.client.rate_limit_retries();
        stats
    }
}

fn log_entered(selection: &Selection) {
    let Some(level) = selection
        .depth()
        .checked_sub(1)
        .and_then(|i| Level::ALL.get(i).copied())
    else {
        return;
    };
    let value = selection.display(level).unwrap_or_default();
    info!(level = %level, "{value}");
}
