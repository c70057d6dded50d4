//! API Routes
//!
//! Configures the Axum router with all dashboard endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    bundle_stats_handler, cache_invalidate_handler, cache_stats_handler,
    compression_stats_handler, contributions_handler, dashboard_handler, health_handler,
    periods_handler, reviews_handler, statistics_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Bundled dashboard page
/// - `GET /api/statistics` - Headline PR statistics
/// - `GET /api/periods` - Fixed-window activity buckets
/// - `GET /api/reviews` - Review efficiency summary
/// - `GET /api/contributions` - Per-author contributions
/// - `GET /internal/cache` - Cache statistics
/// - `DELETE /internal/cache` - Clear cache (or drop keys by `pattern`)
/// - `GET /internal/compression` - Compression statistics
/// - `GET /internal/bundle` - Bundle size statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/api/statistics", get(statistics_handler))
        .route("/api/periods", get(periods_handler))
        .route("/api/reviews", get(reviews_handler))
        .route("/api/contributions", get(contributions_handler))
        .route(
            "/internal/cache",
            get(cache_stats_handler).delete(cache_invalidate_handler),
        )
        .route("/internal/compression", get(compression_stats_handler))
        .route("/internal/bundle", get(bundle_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
