//! The user's library of saved items.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.mangashelf/
//! ├── library.json          # JSON array of saved entries
//! ├── library.json.lock     # advisory lock held during writes
//! └── library.json.bak      # last malformed library, if any
//! ```

pub mod entry;
pub mod store;

pub use entry::{Library, LibraryEntry};
pub use store::{JsonLibraryStore, LibraryError, LibraryStore, MemoryLibraryStore};
