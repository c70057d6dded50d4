//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// A single cached value with size and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Serialized size of the value in bytes
    pub size_bytes: usize,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    /// Creates a new cache entry expiring `ttl_ms` milliseconds from now.
    ///
    /// `size_bytes` is the serialized byte size measured by the store; the
    /// entry does not re-serialize the value itself.
    pub fn new(value: Value, size_bytes: usize, ttl_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            size_bytes,
            created_at: now,
            expires_at: now.saturating_add(ttl_ms),
        }
    }

    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is
    /// greater than or equal to the expiration time, so a TTL of zero is
    /// expired immediately.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    /// Returns remaining TTL in milliseconds (0 once expired).
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let value = json!({"count": 3});
        let size = serde_json::to_vec(&value).unwrap().len();
        let entry = CacheEntry::new(value.clone(), size, 60_000);

        assert_eq!(entry.value, value);
        assert_eq!(entry.size_bytes, size);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(json!("v"), 3, 50);

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = CacheEntry::new(json!("v"), 3, 0);
        assert!(entry.is_expired(), "Entry with zero TTL should be expired");
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = CacheEntry::new(json!("v"), 3, 10_000);

        let remaining = entry.ttl_remaining_ms();
        assert!(remaining <= 10_000);
        assert!(remaining >= 9_000);
    }

    #[test]
    fn test_ttl_remaining_after_expiry() {
        let entry = CacheEntry::new(json!("v"), 3, 0);
        assert_eq!(entry.ttl_remaining_ms(), 0);
    }
}
