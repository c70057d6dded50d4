//! Compression Statistics Module
//!
//! Cumulative bytes-in/bytes-out accounting across compressor calls.

use serde::Serialize;

// == Compression Stats ==
/// Running totals for all compression operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompressionStats {
    /// Number of compress calls recorded
    pub operations: u64,
    /// Total serialized payload bytes seen
    pub total_original_bytes: u64,
    /// Total bytes after compression (equal to input for passthroughs)
    pub total_compressed_bytes: u64,
}

impl CompressionStats {
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one compression operation.
    pub fn record(&mut self, original_bytes: usize, compressed_bytes: usize) {
        self.operations += 1;
        self.total_original_bytes += original_bytes as u64;
        self.total_compressed_bytes += compressed_bytes as u64;
    }

    /// Running compression ratio (original / compressed), 1.0 before any data.
    pub fn ratio(&self) -> f64 {
        if self.total_compressed_bytes == 0 {
            1.0
        } else {
            self.total_original_bytes as f64 / self.total_compressed_bytes as f64
        }
    }

    /// Percentage of bytes saved, rounded to one decimal place.
    pub fn percent_saved(&self) -> f64 {
        if self.total_original_bytes == 0 {
            return 0.0;
        }
        let saved = (1.0
            - self.total_compressed_bytes as f64 / self.total_original_bytes as f64)
            * 100.0;
        (saved * 10.0).round() / 10.0
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
