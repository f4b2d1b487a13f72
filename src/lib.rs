//! Studio Downloader Core Library
//!
//! This library walks the studio comparison scene widget's dependent
//! attribute hierarchy (lighting, camera, format, ISO) and downloads the
//! sample images published for every combination into a stable directory
//! tree.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`selection`] - Left-to-right filled lighting/camera/format/ISO tuples
//! - [`api`] - Discovery payloads, response types and the retrying HTTP client
//! - [`download`] - Destination paths, filename handling and idempotent asset fetches
//! - [`enumerator`] - The four-level walk with the download cap threaded through
//! - [`config`] - Run-wide tunables with production defaults

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod config;
pub mod download;
pub mod enumerator;
pub mod selection;
mod user_agent;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::{
    ApiError, AssetPair, AttributeResponse, AttributeValue, DiscoveryPayload, FailureType,
    RetryDecision, RetryPolicy, StudioClient, classify_status,
};
pub use config::StudioConfig;
pub use download::{DownloadError, DownloadTarget, FetchOutcome, Fetcher, LeafReport};
pub use enumerator::{DownloadCap, Enumerator, RunError, RunStats};
pub use selection::{Level, Selection, SelectionError};
