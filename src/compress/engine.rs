//! Compression Engine Module
//!
//! gzip codec for JSON payloads destined for an external store. Small or
//! poorly-compressing payloads pass through uncompressed; the envelope
//! records which path was taken so decompression stays symmetric.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Value};
use tracing::warn;

use crate::compress::{CompressionStats, Envelope};
use crate::error::{DashboardError, Result};

// == Thresholds ==
/// Payloads below this serialized size skip compression entirely.
pub const MIN_COMPRESS_SIZE: usize = 1024;

/// Compression must achieve at least this ratio to be kept.
pub const MIN_RATIO: f64 = 1.2;

/// Marker set on individually compressed fields.
const FIELD_MARKER: &str = "__compressed";

/// Marker set on objects containing compressed fields.
const PARENT_MARKER: &str = "__hasCompressedFields";

// == Compressor ==
/// Stateful gzip compressor with cumulative statistics.
#[derive(Debug, Default)]
pub struct Compressor {
    stats: CompressionStats,
}

impl Compressor {
    /// Creates a new compressor with zeroed statistics.
    pub fn new() -> Self {
        Self {
            stats: CompressionStats::new(),
        }
    }

    // == Compress ==
    /// Wraps `data` in an [`Envelope`], gzip-compressing it when worthwhile.
    ///
    /// Without `force`, payloads under [`MIN_COMPRESS_SIZE`] bytes or with a
    /// compression ratio under [`MIN_RATIO`] are returned uncompressed.
    /// Every call updates cumulative statistics.
    pub fn compress(&mut self, data: &Value, force: bool) -> Result<Envelope> {
        let serialized = serde_json::to_vec(data)?;
        let original_size = serialized.len();

        if !force && original_size < MIN_COMPRESS_SIZE {
            self.stats.record(original_size, original_size);
            return Ok(Envelope::passthrough(data.clone(), original_size));
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&serialized)?;
        let compressed = encoder.finish()?;
        let compressed_size = compressed.len();
        let ratio = original_size as f64 / compressed_size as f64;

        if !force && ratio < MIN_RATIO {
            self.stats.record(original_size, original_size);
            return Ok(Envelope::passthrough(data.clone(), original_size));
        }

        self.stats.record(original_size, compressed_size);
        Ok(Envelope {
            compressed: true,
            data: Value::String(BASE64.encode(&compressed)),
            original_size,
            compressed_size,
            ratio,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }

    // == Decompress ==
    /// Recovers the original value from an envelope.
    ///
    /// A corrupt envelope whose payload is already structured data is
    /// returned as-is with a warning; envelopes flagged compressed but
    /// holding undecodable payloads fail with a decompression error.
    pub fn decompress(&self, envelope: &Envelope) -> Result<Value> {
        if !envelope.compressed {
            return Ok(envelope.data.clone());
        }

        match Self::decode(&envelope.data) {
            Ok(value) => Ok(value),
            Err(err) => {
                if envelope.data.is_object() || envelope.data.is_array() {
                    warn!(
                        error = %err,
                        "envelope flagged compressed but payload is structured, returning as-is"
                    );
                    Ok(envelope.data.clone())
                } else {
                    Err(DashboardError::Decompression(err.to_string()))
                }
            }
        }
    }

    // == Compress Large Fields ==
    /// Compresses only the named sub-fields of `obj` whose serialized size
    /// reaches the threshold.
    ///
    /// Compressed fields are replaced by a marked wrapper and the parent is
    /// tagged so the decompressor knows which fields to touch. Non-object
    /// inputs are returned unchanged.
    pub fn compress_large_fields(&mut self, obj: &Value, fields: &[&str]) -> Result<Value> {
        let mut out = obj.clone();
        let Some(map) = out.as_object_mut() else {
            return Ok(out);
        };

        let mut tagged_any = false;
        for &field in fields {
            let Some(value) = map.get(field) else {
                continue;
            };
            let size = serde_json::to_vec(value)?.len();
            if size < MIN_COMPRESS_SIZE {
                continue;
            }

            let envelope = self.compress(value, true)?;
            map.insert(
                field.to_string(),
                json!({
                    FIELD_MARKER: true,
                    "data": envelope.data,
                    "originalSize": envelope.original_size,
                    "compressedSize": envelope.compressed_size,
                }),
            );
            tagged_any = true;
        }

        if tagged_any {
            map.insert(PARENT_MARKER.to_string(), Value::Bool(true));
        }
        Ok(out)
    }

    // == Decompress Large Fields ==
    /// Restores fields previously packed by [`compress_large_fields`].
    ///
    /// Objects without the parent marker are returned unchanged; only
    /// fields carrying the field marker are decoded.
    ///
    /// [`compress_large_fields`]: Self::compress_large_fields
    pub fn decompress_large_fields(&self, obj: &Value, fields: &[&str]) -> Result<Value> {
        let mut out = obj.clone();
        let Some(map) = out.as_object_mut() else {
            return Ok(out);
        };

        let tagged = map
            .get(PARENT_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !tagged {
            return Ok(out);
        }

        for &field in fields {
            let Some(wrapper) = map.get(field) else {
                continue;
            };
            let marked = wrapper
                .get(FIELD_MARKER)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if !marked {
                continue;
            }

            let payload = wrapper.get("data").cloned().unwrap_or(Value::Null);
            let restored = Self::decode(&payload)
                .map_err(|err| DashboardError::Decompression(err.to_string()))?;
            map.insert(field.to_string(), restored);
        }

        map.remove(PARENT_MARKER);
        Ok(out)
    }

    // == Stats ==
    /// Returns a snapshot of cumulative compression statistics.
    pub fn stats(&self) -> CompressionStats {
        self.stats.clone()
    }

    /// Resets cumulative statistics to zero.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // base64 string -> gunzip -> JSON value
    fn decode(data: &Value) -> anyhow::Result<Value> {
        let encoded = data
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("compressed payload is not a base64 string"))?;
        let compressed = BASE64.decode(encoded)?;

        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut serialized = Vec::new();
        decoder.read_to_end(&mut serialized)?;

        Ok(serde_json::from_slice(&serialized)?)
    }
}
