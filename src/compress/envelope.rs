//! Compression Envelope Module
//!
//! The envelope pairs a payload with the metadata needed to reverse the
//! compression applied to it. Immutable once created; field names follow
//! the persisted camelCase contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Envelope ==
/// Wrapper around a possibly-compressed JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Whether `data` holds base64 gzip bytes or the original value
    pub compressed: bool,
    /// Base64 string when compressed, the untouched value otherwise
    pub data: Value,
    /// Serialized payload size before compression, in bytes
    pub original_size: usize,
    /// Stored size in bytes (equals `original_size` when not compressed)
    pub compressed_size: usize,
    /// original_size / compressed_size; >= 1.0 means space was saved
    pub ratio: f64,
    /// Creation time, Unix milliseconds
    pub timestamp: i64,
}

impl Envelope {
    /// Builds an uncompressed envelope carrying the value as-is.
    pub fn passthrough(data: Value, original_size: usize) -> Self {
        Self {
            compressed: false,
            data,
            original_size,
            compressed_size: original_size,
            ratio: 1.0,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}
