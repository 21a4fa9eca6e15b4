//! Core aggregation logic.
//!
//! This module contains:
//! - Aggregator: builds a detail view from the remote lookups
//! - Feed: chapter ordering
//! - Cancel: cancellation of in-flight loads

pub mod aggregator;
pub mod cancel;
pub mod feed;

// Re-export commonly used types
pub use aggregator::{AggregateError, Aggregator};
pub use cancel::CancellationToken;
pub use feed::{chapter_value, sort_feed};
