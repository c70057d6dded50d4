//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with byte-budget LRU eviction
//! and lazy TTL expiration. No operation here returns an error: lookups miss,
//! oversized inserts are rejected by return value, deletes are idempotent.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, RecencyList};

// == Cache Store ==
/// In-memory key/value cache bounded by total serialized byte size.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Access order, oldest first
    recency: RecencyList,
    /// Performance statistics; `current_size_bytes` is the size invariant
    stats: CacheStats,
    /// Maximum total size of stored values in bytes
    max_size_bytes: usize,
    /// TTL in milliseconds applied when `set` is called without one
    default_ttl_ms: u64,
}

impl CacheStore {
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_size_bytes` - Total capacity in serialized bytes
    /// * `default_ttl_ms` - TTL applied to entries stored without an explicit TTL
    pub fn new(max_size_bytes: usize, default_ttl_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(max_size_bytes),
            max_size_bytes,
            default_ttl_ms,
        }
    }

    // == Key Generation ==
    /// Builds a deterministic cache key from a namespace and parameter pairs.
    ///
    /// Parameters are sorted by name before serialization so equivalent
    /// parameter sets produce the same key regardless of insertion order.
    pub fn generate_key(namespace: &str, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(name, _)| *name);

        let query: Vec<String> = sorted
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        format!("{}:{}", namespace, query.join("&"))
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A hit moves the entry to the most-recently-used position. An entry
    /// past its expiry is removed and reported as a miss, same as an absent
    /// key (lazy expiration).
    pub fn get(&mut self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.remove_entry(key);
                self.stats.record_miss();
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.recency.record_use(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores a value under `key`, evicting least-recently-used entries
    /// until it fits.
    ///
    /// Returns `false` without touching the cache when the serialized value
    /// alone exceeds total capacity; callers fall back to uncached
    /// computation. Storing over an existing key replaces it (its size is
    /// released before the new size is accounted).
    pub fn set(&mut self, key: String, value: Value, ttl_ms: Option<u64>) -> bool {
        let size_bytes = match serde_json::to_vec(&value) {
            Ok(bytes) => bytes.len(),
            Err(_) => return false,
        };

        if size_bytes > self.max_size_bytes {
            tracing::debug!(
                key = %key,
                size_bytes,
                max = self.max_size_bytes,
                "rejecting oversized cache entry"
            );
            return false;
        }

        // Release any existing entry first so its size is not double-counted
        self.remove_entry(&key);

        // Evict oldest entries until the new one fits
        while self.stats.current_size_bytes + size_bytes > self.max_size_bytes {
            match self.recency.pop_oldest() {
                Some(victim) => {
                    if let Some(evicted) = self.entries.remove(&victim) {
                        self.stats.current_size_bytes -= evicted.size_bytes;
                    }
                    self.stats.record_eviction();
                }
                None => break,
            }
        }

        let ttl = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.entries
            .insert(key.clone(), CacheEntry::new(value, size_bytes, ttl));
        self.recency.record_use(&key);
        self.stats.current_size_bytes += size_bytes;
        self.stats.entry_count = self.entries.len();

        true
    }

    // == Delete ==
    /// Removes an entry if present. Idempotent; returns whether an entry
    /// was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Delete Pattern ==
    /// Removes all entries whose key matches `pattern`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_pattern(&mut self, pattern: &Regex) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pattern.is_match(key))
            .cloned()
            .collect();

        let count = matching.len();
        for key in matching {
            self.remove_entry(&key);
        }
        count
    }

    // == Evict Expired ==
    /// Eagerly removes all expired entries.
    ///
    /// Returns the number of entries removed. Expiration is otherwise lazy
    /// (handled inside `get`), so this exists for callers wanting an
    /// explicit sweep.
    pub fn evict_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired.len();
        for key in expired {
            self.remove_entry(&key);
        }
        count
    }

    // == Clear ==
    /// Empties the cache and resets all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.stats.reset();
    }

    // == Stats ==
    /// Returns a snapshot of current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.entry_count = self.entries.len();
        stats
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys ordered from least to most recently used. Test and debug aid.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.recency.iter().cloned().collect()
    }

    // Removes an entry and keeps size accounting and recency in sync.
    fn remove_entry(&mut self, key: &str) -> bool {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(key);
            self.stats.current_size_bytes -= entry.size_bytes;
            self.stats.entry_count = self.entries.len();
            true
        } else {
            false
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    const CAP: usize = 1024 * 1024;
    const TTL: u64 = 300_000;

    fn value_of_size(bytes: usize) -> Value {
        // A JSON string serializes to its content plus two quotes
        Value::String("x".repeat(bytes - 2))
    }

    #[test]
    fn test_generate_key_sorts_params() {
        let a = CacheStore::generate_key("prs", &[("repo", "core"), ("days", "30")]);
        let b = CacheStore::generate_key("prs", &[("days", "30"), ("repo", "core")]);

        assert_eq!(a, b);
        assert_eq!(a, "prs:days=30&repo=core");
    }

    #[test]
    fn test_generate_key_no_params() {
        assert_eq!(CacheStore::generate_key("teams", &[]), "teams:");
    }

    #[test]
    fn test_set_and_get() {
        let mut store = CacheStore::new(CAP, TTL);

        assert!(store.set("k".to_string(), json!({"n": 1}), None));
        assert_eq!(store.get("k"), Some(json!({"n": 1})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_counts_miss() {
        let mut store = CacheStore::new(CAP, TTL);

        assert_eq!(store.get("nope"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_miss_and_removed() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("k".to_string(), json!("v"), Some(50));
        sleep(Duration::from_millis(80));

        assert_eq!(store.get("k"), None);
        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(store.len(), 0);
        assert_eq!(stats.current_size_bytes, 0);
    }

    #[test]
    fn test_oversized_set_rejected_cache_unchanged() {
        let mut store = CacheStore::new(100, TTL);

        store.set("small".to_string(), value_of_size(40), None);
        let before = store.stats();

        assert!(!store.set("big".to_string(), value_of_size(200), None));

        let after = store.stats();
        assert_eq!(after.entry_count, before.entry_count);
        assert_eq!(after.current_size_bytes, before.current_size_bytes);
        assert!(store.get("small").is_some());
    }

    #[test]
    fn test_overwrite_releases_old_size() {
        let mut store = CacheStore::new(1000, TTL);

        store.set("k".to_string(), value_of_size(400), None);
        store.set("k".to_string(), value_of_size(100), None);

        let stats = store.stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.current_size_bytes, 100);
    }

    #[test]
    fn test_lru_eviction_by_size() {
        // Capacity 1000, A/B/C of 400 bytes each: inserting C must evict
        // A, the oldest untouched entry.
        let mut store = CacheStore::new(1000, TTL);

        store.set("a".to_string(), value_of_size(400), None);
        store.set("b".to_string(), value_of_size(400), None);
        store.set("c".to_string(), value_of_size(400), None);

        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_get_protects_entry_from_eviction() {
        // Touching A after inserting B makes B the eviction victim.
        let mut store = CacheStore::new(1000, TTL);

        store.set("a".to_string(), value_of_size(400), None);
        store.set("b".to_string(), value_of_size(400), None);
        store.get("a");
        store.set("c".to_string(), value_of_size(400), None);

        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
        assert!(store.get("c").is_some());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("k".to_string(), json!("v"), None);
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert_eq!(store.stats().current_size_bytes, 0);
    }

    #[test]
    fn test_delete_pattern() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("prs:days=7".to_string(), json!(1), None);
        store.set("prs:days=30".to_string(), json!(2), None);
        store.set("teams:".to_string(), json!(3), None);

        let pattern = Regex::new(r"^prs:").unwrap();
        let removed = store.delete_pattern(&pattern);

        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("teams:").is_some());
    }

    #[test]
    fn test_evict_expired_sweep() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("short".to_string(), json!(1), Some(50));
        store.set("long".to_string(), json!(2), Some(60_000));
        sleep(Duration::from_millis(80));

        let removed = store.evict_expired();

        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_clear_resets_counters() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("k".to_string(), json!("v"), None);
        store.get("k");
        store.get("missing");
        store.clear();

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.current_size_bytes, 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_size_accounting_tracks_sum() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("a".to_string(), value_of_size(100), None);
        store.set("b".to_string(), value_of_size(250), None);
        store.delete("a");
        store.set("c".to_string(), value_of_size(50), None);

        assert_eq!(store.stats().current_size_bytes, 300);
    }

    #[test]
    fn test_recency_order_exposed() {
        let mut store = CacheStore::new(CAP, TTL);

        store.set("a".to_string(), json!(1), None);
        store.set("b".to_string(), json!(2), None);
        store.get("a");

        assert_eq!(store.keys_by_recency(), vec!["b", "a"]);
    }
}
