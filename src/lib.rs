//! mangashelf - Manga detail aggregation with a local library
//!
//! Builds a single detail view for a MangaDex title from several remote
//! lookups, and keeps a small library of saved titles on disk.
//!
//! # Architecture
//!
//! - The gateway performs the remote lookups (item, cover, author, feed)
//! - The aggregator combines them into one `DetailView`; only a missing
//!   base item fails the load, every other lookup degrades to a placeholder
//! - The library store persists saved titles, keyed by id
//! - The view controller owns one screen's state and the save toggle
//!
//! # Modules
//!
//! - `adapters`: Remote catalog gateway (MangaDex)
//! - `core`: Aggregation, feed ordering, cancellation
//! - `domain`: Data structures (ItemRecord, FeedEntry, DetailView)
//! - `library`: Saved-item storage
//! - `view`: Screen state
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show a title
//! mangashelf show <manga-id>
//!
//! # Save or unsave it
//! mangashelf toggle <manga-id>
//!
//! # List saved titles
//! mangashelf library
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod view;

// Re-export main types at crate root for convenience
pub use adapters::{GatewayError, ItemGateway, MangaDexGateway};
pub use core::{AggregateError, Aggregator};
pub use domain::{DetailView, FeedEntry, ItemRecord};
pub use library::{JsonLibraryStore, LibraryEntry, LibraryStore, MemoryLibraryStore};
pub use view::{ViewController, ViewSnapshot, ViewState};
