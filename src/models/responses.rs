//! Response DTOs for the dashboard API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::compress::CompressionStats;

/// Response body for GET /internal/cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entry_count: usize,
    pub current_size_bytes: usize,
    pub max_size_bytes: usize,
    pub hit_rate_percent: f64,
    pub utilization_percent: f64,
}

impl From<CacheStats> for CacheStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate_percent: stats.hit_rate_percent(),
            utilization_percent: stats.utilization_percent(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            entry_count: stats.entry_count,
            current_size_bytes: stats.current_size_bytes,
            max_size_bytes: stats.max_size_bytes,
        }
    }
}

/// Response body for GET /internal/compression
#[derive(Debug, Clone, Serialize)]
pub struct CompressionStatsResponse {
    pub operations: u64,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub ratio: f64,
    pub percent_saved: f64,
}

impl From<CompressionStats> for CompressionStatsResponse {
    fn from(stats: CompressionStats) -> Self {
        Self {
            ratio: stats.ratio(),
            percent_saved: stats.percent_saved(),
            operations: stats.operations,
            total_original_bytes: stats.total_original_bytes,
            total_compressed_bytes: stats.total_compressed_bytes,
        }
    }
}

/// Response body for DELETE /internal/cache
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// What happened
    pub message: String,
    /// Entries removed; absent for a full clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
}

impl InvalidateResponse {
    /// Full-clear variant.
    pub fn cleared() -> Self {
        Self {
            message: "cache cleared".to_string(),
            removed: None,
        }
    }

    /// Pattern-invalidation variant.
    pub fn removed(count: usize) -> Self {
        Self {
            message: format!("{} entries removed", count),
            removed: Some(count),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_stats_response_from_stats() {
        let mut stats = CacheStats::new(1000);
        stats.record_hit();
        stats.record_miss();
        stats.current_size_bytes = 400;

        let resp = CacheStatsResponse::from(stats);

        assert_eq!(resp.hit_rate_percent, 50.0);
        assert_eq!(resp.utilization_percent, 40.0);
        assert_eq!(resp.max_size_bytes, 1000);
    }

    #[test]
    fn test_compression_stats_response() {
        let mut stats = CompressionStats::new();
        stats.record(2000, 1000);

        let resp = CompressionStatsResponse::from(stats);

        assert_eq!(resp.ratio, 2.0);
        assert_eq!(resp.percent_saved, 50.0);
    }

    #[test]
    fn test_invalidate_response_serialization() {
        let cleared = serde_json::to_value(InvalidateResponse::cleared()).unwrap();
        assert!(cleared.get("removed").is_none());

        let removed = serde_json::to_value(InvalidateResponse::removed(3)).unwrap();
        assert_eq!(removed["removed"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
