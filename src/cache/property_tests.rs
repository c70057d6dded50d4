//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the size-accounting, LRU-retention and
//! statistics properties of the cache store.

use proptest::prelude::*;
use serde_json::Value;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_CAPACITY: usize = 4096;
const TEST_TTL_MS: u64 = 300_000;

// == Strategies ==
/// Generates valid cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_:]{1,24}"
}

/// Generates JSON string values of bounded size
fn value_strategy() -> impl Strategy<Value = Value> {
    "[a-zA-Z0-9 ]{1,128}".prop_map(Value::String)
}

/// A sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn serialized_size(value: &Value) -> usize {
    serde_json::to_vec(value).unwrap().len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Size accounting: after any operation sequence, current_size_bytes
    // equals the exact sum of the serialized sizes of stored entries.
    #[test]
    fn prop_size_accounting_invariant(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_TTL_MS);
        let mut shadow: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let size = serialized_size(&value);
                    if store.set(key.clone(), value, None) {
                        shadow.insert(key, size);
                        // Mirror evictions: drop shadow keys no longer cached
                        shadow.retain(|k, _| store.keys_by_recency().contains(k));
                    }
                }
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Delete { key } => {
                    if store.delete(&key) {
                        shadow.remove(&key);
                    }
                }
            }
        }

        let expected: usize = shadow.values().sum();
        prop_assert_eq!(store.stats().current_size_bytes, expected, "size accounting drifted");
        prop_assert_eq!(store.len(), shadow.len(), "entry count drifted");
    }

    // Capacity: the cache never holds more bytes than its budget.
    #[test]
    fn prop_capacity_never_exceeded(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..120)
    ) {
        let capacity = 512;
        let mut store = CacheStore::new(capacity, TEST_TTL_MS);

        for (key, value) in entries {
            let _ = store.set(key, value, None);
            prop_assert!(
                store.stats().current_size_bytes <= capacity,
                "cache holds {} bytes, budget is {}",
                store.stats().current_size_bytes,
                capacity
            );
        }
    }

    // Round-trip: a stored value is returned unchanged before expiry.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_TTL_MS);

        prop_assert!(store.set(key.clone(), value.clone(), None));
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // Delete: a deleted key is gone, and deleting again is a no-op.
    #[test]
    fn prop_delete_removes_entry(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_TTL_MS);

        store.set(key.clone(), value, None);
        prop_assert!(store.delete(&key));
        prop_assert!(!store.delete(&key));
        prop_assert!(store.get(&key).is_none());
    }

    // Statistics: hits and misses reflect exactly the lookups performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_CAPACITY, TEST_TTL_MS);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(key, value, None);
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    let _ = store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
    }

    // Key generation is order-independent and deterministic.
    #[test]
    fn prop_generate_key_order_independent(
        mut params in prop::collection::vec(("[a-z]{1,8}", "[a-z0-9]{1,8}"), 1..6)
    ) {
        let forward: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let key_forward = CacheStore::generate_key("ns", &forward);

        params.reverse();
        let reversed: Vec<(&str, &str)> =
            params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let key_reversed = CacheStore::generate_key("ns", &reversed);

        prop_assert_eq!(key_forward, key_reversed);
    }
}

// LRU retention: the survivors of an over-budget insert sequence are
// exactly the most recently used keys, in recency order.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_lru_retains_most_recent(keys in prop::collection::vec(key_strategy(), 4..12)) {
        let unique: Vec<String> = keys
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        prop_assume!(unique.len() >= 4);

        // Each value serializes to exactly 100 bytes; capacity fits three.
        let capacity = 300;
        let mut store = CacheStore::new(capacity, TEST_TTL_MS);

        for key in &unique {
            store.set(key.clone(), Value::String("x".repeat(98)), None);
        }

        let survivors = store.keys_by_recency();
        let expected: Vec<String> = unique[unique.len() - 3..].to_vec();
        prop_assert_eq!(survivors, expected, "retained set is not the most recent subset");
    }
}
