//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum total size of cached values in bytes
    pub cache_max_bytes: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// TTL in milliseconds applied to cached API responses
    pub response_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Directory containing github_data.json and teams.json
    pub data_dir: PathBuf,
    /// Directory containing the dashboard HTML/CSS/JS sources
    pub static_dir: PathBuf,
    /// Entry HTML document, relative to static_dir
    pub entry_file: String,
    /// Whether the bundler minifies inlined content
    pub minify: bool,
    /// Whether the bundler inlines local images as data URIs
    pub inline_images: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_BYTES` - Total cache capacity in bytes (default: 10 MiB)
    /// - `DEFAULT_TTL_MS` - Default entry TTL in milliseconds (default: 300000)
    /// - `RESPONSE_TTL_MS` - TTL for cached API responses (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `DATA_DIR` - PR/team JSON data directory (default: "data")
    /// - `STATIC_DIR` - Dashboard asset directory (default: "static")
    /// - `ENTRY_FILE` - Entry HTML file name (default: "index.html")
    /// - `BUNDLE_MINIFY` - Minify inlined assets, "true"/"false" (default: true)
    /// - `BUNDLE_INLINE_IMAGES` - Inline images as data URIs (default: false)
    pub fn from_env() -> Self {
        Self {
            cache_max_bytes: env::var("CACHE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            response_ttl_ms: env::var("RESPONSE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300_000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("static")),
            entry_file: env::var("ENTRY_FILE").unwrap_or_else(|_| "index.html".to_string()),
            minify: env::var("BUNDLE_MINIFY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            inline_images: env::var("BUNDLE_INLINE_IMAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_max_bytes: 10 * 1024 * 1024,
            default_ttl_ms: 300_000,
            response_ttl_ms: 300_000,
            server_port: 3000,
            sweep_interval: 60,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            entry_file: "index.html".to_string(),
            minify: true,
            inline_images: false,
        }
    }
}
