//! The aggregated detail view of one item.

use serde::Serialize;

use super::fallback;
use super::feed::FeedEntry;
use super::item::ItemRecord;

/// Display-ready text fields of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub title: String,
    pub alt_title: Option<String>,
    pub description: String,
    pub genres: String,
    pub year: String,
    pub status: String,
}

impl DisplayFields {
    /// Resolve every field of a record, substituting placeholders
    pub fn resolve(item: &ItemRecord) -> Self {
        Self {
            title: fallback::title(item),
            alt_title: fallback::alt_title(item),
            description: fallback::description(item),
            genres: fallback::genres(item),
            year: fallback::year(item),
            status: fallback::status(item),
        }
    }

    /// Alternate title, or its placeholder
    pub fn alt_title_or_placeholder(&self) -> &str {
        self.alt_title.as_deref().unwrap_or(fallback::NO_ALT_TITLE)
    }
}

/// Complete snapshot of an item's detail screen
///
/// Built in one piece by the aggregator and never changed afterwards. A new
/// saved flag means a new view, see [`DetailView::with_saved`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub item: ItemRecord,
    pub fields: DisplayFields,
    pub cover_url: Option<String>,
    pub creator: String,
    pub feed: Vec<FeedEntry>,
    pub is_saved: bool,
}

impl DetailView {
    /// Copy of this view with a different saved flag
    pub fn with_saved(&self, is_saved: bool) -> Self {
        Self {
            is_saved,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    /// Number of fetched chapters
    pub fn chapter_count(&self) -> usize {
        self.feed.len()
    }
}
