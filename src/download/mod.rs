//! Asset downloads for leaf selections.
//!
//! This module turns a fully specified [`Selection`](crate::Selection) into
//! two files on disk:
//!
//! - the destination directory is derived from lighting, camera display name
//!   and format ([`destination_dir`])
//! - filenames come from `Content-Disposition` or the URL tail, sanitized
//!   ([`resolve_filename`])
//! - files that already exist are skipped, which makes reruns resume where
//!   the last one stopped
//!
//! # Example
//!
//! ```no_run
//! use studio_downloader_core::{Fetcher, Selection, StudioClient, StudioConfig};
//!
//! # async fn example(leaf: Selection) -> Result<(), Box<dyn std::error::Error>> {
//! let config = StudioConfig::default();
//! let client = StudioClient::new(&config)?;
//! let report = Fetcher::new(&client, &config).fetch_leaf(&leaf).await?;
//! println!("{} written into {}", report.written(), report.directory.display());
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
pub mod filename;
mod target;

pub use error::DownloadError;
pub use fetcher::{FetchOutcome, Fetcher, LeafReport};
pub use filename::{UNSAFE_FILENAME_CHARS, resolve_filename, sanitize_filename};
pub use target::{DownloadTarget, destination_dir, selection_dir};
