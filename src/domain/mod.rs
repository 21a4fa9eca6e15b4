//! Domain types for mangashelf.
//!
//! This module contains the core data structures:
//! - Item: remote item metadata and its relationships
//! - Feed: chapter entries
//! - Detail: the aggregated view model
//! - Fallback: placeholder policy for display fields

pub mod detail;
pub mod fallback;
pub mod feed;
pub mod item;

// Re-export commonly used types
pub use detail::{DetailView, DisplayFields};
pub use feed::FeedEntry;
pub use item::{
    CoverAsset, ItemAttributes, ItemRecord, LocalizedText, Relationship, RelationshipKind, Tag,
    PREFERRED_LOCALE,
};
