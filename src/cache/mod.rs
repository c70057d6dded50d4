//! Cache Module
//!
//! Provides an in-memory, byte-bounded cache for API responses with TTL
//! expiration and LRU eviction.

mod entry;
mod recency;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::CacheStore;
