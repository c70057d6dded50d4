//! prboard - Pull-request dashboard backend
//!
//! Caches PR analytics in a bounded LRU store, compresses payloads bound
//! for external storage, and bundles the dashboard page into a single
//! self-contained document.

pub mod analytics;
pub mod api;
pub mod bundle;
pub mod cache;
pub mod compress;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
