//! Fetching the asset pair of a leaf selection.
//!
//! Files already present at the destination are never downloaded again, so
//! rerunning over an existing tree only fetches what is missing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::CONTENT_DISPOSITION;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

use super::error::DownloadError;
use super::filename::resolve_filename;
use super::target::{DownloadTarget, selection_dir};
use crate::api::{ApiError, StudioClient};
use crate::config::StudioConfig;
use crate::selection::Selection;

/// Ticks of the progress bar shown before each write.
const PROGRESS_TICKS: u64 = 100;

/// Result of downloading one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The body was written to `path`.
    Written {
        /// Final file path.
        path: PathBuf,
        /// Bytes written.
        bytes: u64,
    },
    /// A file named `path` already existed; nothing was written.
    Skipped {
        /// The existing file.
        path: PathBuf,
    },
}

impl FetchOutcome {
    /// Local path of the asset.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::Written { path, .. } | FetchOutcome::Skipped { path } => path,
        }
    }

    /// Whether this fetch wrote a file.
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, FetchOutcome::Written { .. })
    }
}

/// What happened to both assets of a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafReport {
    pub directory: PathBuf,
    pub original: FetchOutcome,
    pub display: FetchOutcome,
}

impl LeafReport {
    /// Number of files written for this leaf (0 to 2).
    #[must_use]
    pub fn written(&self) -> u64 {
        u64::from(self.original.is_written()) + u64::from(self.display.is_written())
    }

    /// Number of files skipped because they already existed (0 to 2).
    #[must_use]
    pub fn skipped(&self) -> u64 {
        2 - self.written()
    }
}

/// Downloads the assets of leaf selections into the output tree.
#[derive(Debug)]
pub struct Fetcher<'a> {
    client: &'a StudioClient,
    output_root: PathBuf,
    progress_tick: Duration,
}

impl<'a> Fetcher<'a> {
    /// Creates a fetcher writing under `config.output_root`.
    #[must_use]
    pub fn new(client: &'a StudioClient, config: &StudioConfig) -> Self {
        Self {
            client,
            output_root: config.output_root.clone(),
            progress_tick: config.progress_tick,
        }
    }

    /// Looks up the asset pair of `selection` and downloads both files,
    /// original first.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the selection is not a leaf, one of its
    /// values is not a usable directory name, a request fails, or the
    /// destination cannot be written.
    #[instrument(skip(self), fields(selection = %selection))]
    pub async fn fetch_leaf(&self, selection: &Selection) -> Result<LeafReport, DownloadError> {
        if !selection.is_leaf() {
            return Err(DownloadError::IncompleteSelection {
                selection: selection.to_string(),
            });
        }
        let directory = selection_dir(&self.output_root, selection)?;

        let assets = self.client.discover(selection).await?.asset_pair(selection)?;

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(|e| DownloadError::io(&directory, e))?;

        let original = self
            .download(&DownloadTarget {
                directory: directory.clone(),
                url: self.client.asset_url(&assets.original)?,
            })
            .await?;
        let display = self
            .download(&DownloadTarget {
                directory: directory.clone(),
                url: self.client.asset_url(&assets.display)?,
            })
            .await?;

        Ok(LeafReport {
            directory,
            original,
            display,
        })
    }

    /// Downloads one asset into `target.directory` unless a file with the
    /// same name is already there.
    ///
    /// The directory must exist. The whole body is received before anything
    /// is written.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the request fails or the file cannot be
    /// written.
    #[instrument(skip(self), fields(url = %target.url))]
    pub async fn download(&self, target: &DownloadTarget) -> Result<FetchOutcome, DownloadError> {
        let response = self.client.fetch_asset(&target.url).await?;

        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let filename = resolve_filename(content_disposition.as_deref(), &target.url);
        let path = target.directory.join(&filename);

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| DownloadError::io(&path, e))?;
        if exists {
            info!(path = %path.display(), "already exists, skipping download");
            return Ok(FetchOutcome::Skipped { path });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::network(target.url.as_str(), e))?;

        self.show_progress(&filename).await;
        write_file(&path, &body).await?;

        info!(path = %path.display(), bytes = body.len(), "saved");
        Ok(FetchOutcome::Written {
            path,
            bytes: body.len() as u64,
        })
    }

    async fn show_progress(&self, filename: &str) {
        if self.progress_tick.is_zero() {
            return;
        }
        let bar = ProgressBar::new(PROGRESS_TICKS);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40}] {percent}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(format!("Loading {filename}"));
        for _ in 0..PROGRESS_TICKS {
            tokio::time::sleep(self.progress_tick).await;
            bar.inc(1);
        }
        bar.finish_and_clear();
    }
}

/// Writes `body` in one buffered write.
async fn write_file(path: &Path, body: &[u8]) -> Result<(), DownloadError> {
    let file = File::create(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(body)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    writer.flush().await.map_err(|e| DownloadError::io(path, e))?;
    debug!(path = %path.display(), "flushed");
    Ok(())
}
