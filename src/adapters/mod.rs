//! Gateway interfaces for the remote catalog.
//!
//! The gateway performs the four lookups the detail view needs. Cover and
//! item lookups report failure; creator and feed lookups absorb it and
//! hand back placeholder values instead.

pub mod mangadex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::domain::{fallback, CoverAsset, FeedEntry, ItemRecord};

// Re-export the MangaDex gateway
pub use mangadex::MangaDexGateway;

/// Errors from a single remote lookup
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Response from {0} has no data")]
    MissingData(String),
}

/// Trait for remote catalog gateways
#[async_trait]
pub trait ItemGateway: Send + Sync {
    /// Fetch an item's metadata
    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, GatewayError>;

    /// Fetch a cover asset
    async fn fetch_cover(&self, cover_id: &str) -> Result<CoverAsset, GatewayError>;

    /// Fetch a creator's display name
    async fn lookup_creator(&self, creator_id: &str) -> Result<String, GatewayError>;

    /// Fetch an item's chapter feed
    async fn lookup_feed(&self, id: &str) -> Result<Vec<FeedEntry>, GatewayError>;

    /// Creator name, or the unknown-author placeholder on any failure
    async fn fetch_creator_name(&self, creator_id: &str) -> String {
        match self.lookup_creator(creator_id).await {
            Ok(name) => fallback::creator(Some(name.as_str())),
            Err(e) => {
                warn!(creator_id, error = %e, "Creator lookup failed");
                fallback::creator(None)
            }
        }
    }

    /// Chapter feed, or an empty feed on any failure
    async fn fetch_feed(&self, id: &str) -> Vec<FeedEntry> {
        match self.lookup_feed(id).await {
            Ok(feed) => feed,
            Err(e) => {
                warn!(id, error = %e, "Feed lookup failed");
                Vec::new()
            }
        }
    }
}
