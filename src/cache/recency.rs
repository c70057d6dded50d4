//! Recency List Module
//!
//! Tracks key access order for LRU eviction.

use std::collections::VecDeque;

// == Recency List ==
/// Keeps cache keys ordered by last use.
///
/// Keys live in a VecDeque where:
/// - Front = least recently used (next eviction victim)
/// - Back = most recently used
#[derive(Debug, Default)]
pub struct RecencyList {
    order: VecDeque<String>,
}

impl RecencyList {
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    /// Marks a key as just used, moving it to the back.
    ///
    /// A key not yet tracked is simply appended.
    pub fn record_use(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    /// Removes a key from the list. No-op if the key is not tracked.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    /// Drops all tracked keys.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
