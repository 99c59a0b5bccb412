//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::Mutex;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStore, SweepOutcome};

/// Cache handle shared by connection tasks and the reaper.
///
/// Every logical operation runs under this single exclusive lock; reads take
/// it too because they update recency and may expire entries.
pub type SharedCache = Arc<Mutex<CacheStore>>;
