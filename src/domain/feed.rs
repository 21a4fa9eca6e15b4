//! Feed entries (chapters) of an item.

use serde::{Deserialize, Serialize};

/// One chapter in an item's feed
///
/// `chapter` is kept exactly as the remote sent it; ordering parses it
/// on the fly (see [`crate::core::feed`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: String,

    #[serde(default)]
    pub chapter: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

impl FeedEntry {
    pub fn new(id: impl Into<String>, chapter: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            chapter: Some(chapter.into()),
            title: None,
        }
    }

    /// Set the chapter title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Display label, e.g. `Chapter 12 The Duel`
    pub fn label(&self) -> String {
        let number = self.chapter.as_deref().unwrap_or_default();
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("Chapter {} {}", number, title),
            None => format!("Chapter {}", number),
        }
    }
}
