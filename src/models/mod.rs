//! Models Module
//!
//! Request and response DTOs for the HTTP API.

mod queries;
mod responses;

pub use queries::{AnalyticsQuery, InvalidateQuery};
pub use responses::{
    CacheStatsResponse, CompressionStatsResponse, HealthResponse, InvalidateResponse,
};
