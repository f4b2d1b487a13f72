//! Discovery API of the studio comparison widget.
//!
//! Every question the crawler asks ("which cameras exist under this
//! lighting?", "which assets belong to this exact combination?") is one
//! POST of a [`DiscoveryPayload`] to the discovery endpoint. The answer is an
//! [`AttributeResponse`] listing the legal values for the next level and, for
//! fully specified selections, the downloadable images.
//!
//! # Example
//!
//! ```no_run
//! use studio_downloader_core::{Selection, StudioClient, StudioConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StudioClient::new(&StudioConfig::default())?;
//! let response = client.discover(&Selection::new()).await?;
//! for value in response.values_for(studio_downloader_core::Level::Lighting)? {
//!     println!("{}", value.client_value);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod payload;
mod response;
mod retry;

pub use client::StudioClient;
pub use error::ApiError;
pub use payload::{AttributeDescriptor, DiscoveryPayload, PLACEHOLDER_INSTANCE_IDS, SCENE_ID};
pub use response::{AssetPair, AttributeGroup, AttributeResponse, AttributeValue, ImageEntry};
pub use retry::{
    DEFAULT_RATE_LIMIT_DELAY, FailureType, RetryDecision, RetryPolicy, classify_status,
};
