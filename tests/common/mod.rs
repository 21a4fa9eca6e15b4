//! Shared test fixtures: a scripted in-process gateway.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use mangashelf::adapters::{GatewayError, ItemGateway};
use mangashelf::domain::{CoverAsset, FeedEntry, ItemRecord, LocalizedText};

pub const ASSET_HOST: &str = "https://uploads.mangadex.org";

/// Gateway answering from fixed maps; unknown ids fail
#[derive(Default)]
pub struct ScriptedGateway {
    items: HashMap<String, ItemRecord>,
    covers: HashMap<String, String>,
    authors: HashMap<String, String>,
    feeds: HashMap<String, Vec<FeedEntry>>,
    /// Item lookups that wait for a notification before answering
    gates: HashMap<String, Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemRecord) -> Self {
        self.items.insert(item.id.clone(), item);
        self
    }

    pub fn with_cover(mut self, cover_id: &str, file_name: &str) -> Self {
        self.covers.insert(cover_id.to_string(), file_name.to_string());
        self
    }

    pub fn with_author(mut self, author_id: &str, name: &str) -> Self {
        self.authors.insert(author_id.to_string(), name.to_string());
        self
    }

    pub fn with_feed(mut self, item_id: &str, feed: Vec<FeedEntry>) -> Self {
        self.feeds.insert(item_id.to_string(), feed);
        self
    }

    /// Hold lookups of this item until the returned notify fires
    pub fn with_gate(mut self, item_id: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gates.insert(item_id.to_string(), gate.clone());
        (self, gate)
    }

    /// Calls made so far, e.g. `cover:cov1`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn missing(what: &str, id: &str) -> GatewayError {
    GatewayError::MissingData(format!("{}/{}", what, id))
}

#[async_trait]
impl ItemGateway for ScriptedGateway {
    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, GatewayError> {
        self.record(format!("item:{}", id));
        if let Some(gate) = self.gates.get(id) {
            gate.notified().await;
        }
        self.items.get(id).cloned().ok_or_else(|| missing("manga", id))
    }

    async fn fetch_cover(&self, cover_id: &str) -> Result<CoverAsset, GatewayError> {
        self.record(format!("cover:{}", cover_id));
        self.covers
            .get(cover_id)
            .map(CoverAsset::new)
            .ok_or_else(|| missing("cover", cover_id))
    }

    async fn lookup_creator(&self, creator_id: &str) -> Result<String, GatewayError> {
        self.record(format!("author:{}", creator_id));
        self.authors
            .get(creator_id)
            .cloned()
            .ok_or_else(|| missing("author", creator_id))
    }

    async fn lookup_feed(&self, id: &str) -> Result<Vec<FeedEntry>, GatewayError> {
        self.record(format!("feed:{}", id));
        self.feeds.get(id).cloned().ok_or_else(|| missing("feed", id))
    }
}

/// Localized text with a single English value
pub fn english(text: &str) -> LocalizedText {
    [("en", text)].into_iter().collect()
}
