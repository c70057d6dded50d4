//! Compression Module
//!
//! Reduces the storage footprint of JSON payloads before they reach an
//! external store, with a symmetric decompression path.

mod engine;
mod envelope;
mod stats;

// Re-export public types
pub use engine::{Compressor, MIN_COMPRESS_SIZE, MIN_RATIO};
pub use envelope::Envelope;
pub use stats::CompressionStats;
