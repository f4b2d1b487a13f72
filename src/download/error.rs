//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;
use crate::selection::Level;

/// Errors that can occur while fetching a leaf's assets.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Discovery or asset request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// File system error (create directory, create file, write).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A server-provided level value is not a single plain path component
    /// (empty, `.`/`..`, absolute, or containing a separator).
    #[error("{level} value {segment:?} cannot be used as a directory name")]
    UnsafeDirectory {
        /// The level the value belongs to.
        level: Level,
        /// The offending value, after lowercasing where that applies.
        segment: String,
    },

    /// Fetch was asked for a selection that is not a leaf.
    #[error("selection {selection} is not fully specified")]
    IncompleteSelection {
        /// The selection, rendered for the message.
        selection: String,
    },
}

impl DownloadError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
