//! Saved library entries and the in-memory library model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DetailView;

/// A saved item summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// Item identifier (unique within a library)
    pub id: String,

    /// Display title at the time of saving
    #[serde(default)]
    pub title: String,

    /// Cover URL at the time of saving
    #[serde(default)]
    pub cover_image_url: Option<String>,

    /// Number of chapters fetched when saved
    #[serde(default)]
    pub chapter_count: usize,

    /// When the entry was saved (absent for older entries)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl LibraryEntry {
    /// Create a new entry
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cover_image_url: None,
            chapter_count: 0,
            saved_at: None,
        }
    }

    /// Summarize a loaded detail view
    pub fn from_view(view: &DetailView) -> Self {
        Self {
            id: view.id().to_string(),
            title: view.fields.title.clone(),
            cover_image_url: view.cover_url.clone(),
            chapter_count: view.chapter_count(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Set the cover URL
    pub fn with_cover(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = Some(url.into());
        self
    }

    /// Set the chapter count
    pub fn with_chapter_count(mut self, count: usize) -> Self {
        self.chapter_count = count;
        self
    }
}

/// Ordered set of entries keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    entries: Vec<LibraryEntry>,
}

impl Library {
    /// Create a new empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from stored entries, dropping repeated ids
    ///
    /// The first occurrence of an id keeps its position and value.
    pub fn from_entries(entries: Vec<LibraryEntry>) -> Self {
        let mut library = Self::new();
        for entry in entries {
            if !library.contains(&entry.id) {
                library.entries.push(entry);
            }
        }
        library
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Get an entry by ID
    pub fn get(&self, id: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Insert or replace an entry; returns true if the id was new
    pub fn upsert(&mut self, entry: LibraryEntry) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    /// Remove an entry by ID; returns true if something was removed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LibraryEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
