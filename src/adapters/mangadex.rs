//! MangaDex API gateway.
//!
//! Endpoints:
//! - GET /manga/{id}
//! - GET /cover/{id}
//! - GET /author/{id}
//! - GET /manga/{id}/feed

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{GatewayError, ItemGateway};
use crate::config::RemoteSettings;
use crate::domain::{CoverAsset, FeedEntry, ItemRecord};

/// MangaDex API client
pub struct MangaDexGateway {
    /// API base URL
    base_url: String,
    /// Chapters requested per feed
    feed_limit: u32,
    /// Translated language filter for the feed
    feed_language: String,
    /// HTTP client
    client: reqwest::Client,
}

/// Response envelope: `{"result": "ok", "data": ...}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CoverData {
    attributes: CoverAttributes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverAttributes {
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthorData {
    attributes: AuthorAttributes,
}

#[derive(Debug, Deserialize)]
struct AuthorAttributes {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChapterData {
    id: String,
    #[serde(default)]
    attributes: ChapterAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct ChapterAttributes {
    chapter: Option<String>,
    title: Option<String>,
}

impl From<ChapterData> for FeedEntry {
    fn from(data: ChapterData) -> Self {
        Self {
            id: data.id,
            chapter: data.attributes.chapter,
            title: data.attributes.title,
        }
    }
}

impl MangaDexGateway {
    /// Create a gateway from remote settings
    pub fn new(settings: &RemoteSettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            feed_limit: settings.feed_limit,
            feed_language: settings.feed_language.clone(),
            client,
        })
    }

    /// Build an endpoint URL
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Query parameters for the chapter feed
    fn feed_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.feed_limit.to_string()),
            ("translatedLanguage[]", self.feed_language.clone()),
            ("order[chapter]", "desc".to_string()),
            ("includeEmptyPages", "0".to_string()),
        ]
    }

    /// GET a resource and unwrap its `data` field
    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        debug!(url, "GET");

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                url: url.to_string(),
                status,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| GatewayError::MissingData(url.to_string()))
    }
}

#[async_trait]
impl ItemGateway for MangaDexGateway {
    async fn fetch_item(&self, id: &str) -> Result<ItemRecord, GatewayError> {
        let url = self.endpoint(&format!("manga/{}", id));
        self.get_data(&url, &[]).await
    }

    async fn fetch_cover(&self, cover_id: &str) -> Result<CoverAsset, GatewayError> {
        let url = self.endpoint(&format!("cover/{}", cover_id));
        let cover: CoverData = self.get_data(&url, &[]).await?;

        cover
            .attributes
            .file_name
            .filter(|name| !name.is_empty())
            .map(CoverAsset::new)
            .ok_or(GatewayError::MissingData(url))
    }

    async fn lookup_creator(&self, creator_id: &str) -> Result<String, GatewayError> {
        let url = self.endpoint(&format!("author/{}", creator_id));
        let author: AuthorData = self.get_data(&url, &[]).await?;

        author
            .attributes
            .name
            .ok_or(GatewayError::MissingData(url))
    }

    async fn lookup_feed(&self, id: &str) -> Result<Vec<FeedEntry>, GatewayError> {
        let url = self.endpoint(&format!("manga/{}/feed", id));
        let chapters: Vec<ChapterData> = self.get_data(&url, &self.feed_query()).await?;

        Ok(chapters.into_iter().map(FeedEntry::from).collect())
    }
}
