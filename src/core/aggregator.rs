//! Detail-view aggregation.
//!
//! Fetches the base item, then its cover, creator and feed concurrently,
//! and assembles them into one [`DetailView`]. Only a missing base item is
//! an error; every secondary failure degrades its field instead.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::adapters::ItemGateway;
use crate::domain::{fallback, DetailView, DisplayFields, ItemRecord};
use crate::library::LibraryStore;

use super::feed::sort_feed;

/// Errors that cross the aggregator boundary
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// Builds detail views from the gateway and the library
pub struct Aggregator {
    gateway: Arc<dyn ItemGateway>,
    library: Arc<dyn LibraryStore>,
    /// Base URL cover files are served from
    asset_host: String,
}

impl Aggregator {
    pub fn new(
        gateway: Arc<dyn ItemGateway>,
        library: Arc<dyn LibraryStore>,
        asset_host: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            library,
            asset_host: asset_host.into(),
        }
    }

    /// Load the complete detail view for an item
    #[instrument(skip(self))]
    pub async fn load_detail(&self, id: &str) -> Result<DetailView, AggregateError> {
        let item = match self.gateway.fetch_item(id).await {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "Item lookup failed");
                return Err(AggregateError::NotFound(id.to_string()));
            }
        };

        let (cover_url, creator, feed) = tokio::join!(
            self.resolve_cover(&item),
            self.resolve_creator(&item),
            self.gateway.fetch_feed(&item.id),
        );
        let feed = sort_feed(&feed);

        let is_saved = match self.library.contains(&item.id).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "Library membership check failed, treating as not saved");
                false
            }
        };

        info!(
            chapters = feed.len(),
            has_cover = cover_url.is_some(),
            is_saved,
            "Detail view loaded"
        );

        Ok(DetailView {
            fields: DisplayFields::resolve(&item),
            item,
            cover_url,
            creator,
            feed,
            is_saved,
        })
    }

    /// Cover URL for the item's first cover art, if it resolves
    async fn resolve_cover(&self, item: &ItemRecord) -> Option<String> {
        let Some(cover_id) = item.cover_id() else {
            debug!(id = %item.id, "No cover art relationship");
            return None;
        };

        match self.gateway.fetch_cover(cover_id).await {
            Ok(cover) => Some(cover.url(&self.asset_host, &item.id)),
            Err(e) => {
                warn!(cover_id, error = %e, "Cover lookup failed");
                None
            }
        }
    }

    /// Name of the item's first author, or the placeholder
    async fn resolve_creator(&self, item: &ItemRecord) -> String {
        match item.author_id() {
            Some(author_id) => self.gateway.fetch_creator_name(author_id).await,
            None => fallback::creator(None),
        }
    }
}
