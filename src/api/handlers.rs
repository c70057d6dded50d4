//! API Handlers
//!
//! HTTP request handlers. Each analytics handler consults the response
//! cache first, computes from the flat data files on a miss, and runs the
//! result through the compressor before caching it.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;

use crate::analytics::{
    analyze_period_data, analyze_review_efficiency, analyze_team_contributions,
    calculate_pr_statistics, filter_non_members, load_pr_records, load_teams, PrRecord, TeamData,
};
use crate::bundle::{BundleOptions, HtmlBundler};
use crate::cache::CacheStore;
use crate::compress::{Compressor, Envelope};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::models::{
    AnalyticsQuery, CacheStatsResponse, CompressionStatsResponse, HealthResponse, InvalidateQuery,
    InvalidateResponse,
};

/// Default window for the periods endpoint when none is requested.
const DEFAULT_PERIOD_DAYS: i64 = 7;

// == Application State ==
/// Shared state handed to every handler.
///
/// The cache, compressor and bundler hold process-wide mutable state reused
/// across requests; each sits behind its own lock and is constructed
/// exactly once per process.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<CacheStore>>,
    pub compressor: Arc<RwLock<Compressor>>,
    pub bundler: Arc<RwLock<HtmlBundler>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state from already-built components.
    pub fn new(
        cache: CacheStore,
        compressor: Compressor,
        bundler: HtmlBundler,
        config: Config,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            compressor: Arc::new(RwLock::new(compressor)),
            bundler: Arc::new(RwLock::new(bundler)),
            config: Arc::new(config),
        }
    }

    /// Builds all components from configuration.
    pub fn from_config(config: &Config) -> Self {
        let cache = CacheStore::new(config.cache_max_bytes, config.default_ttl_ms);
        let compressor = Compressor::new();
        let bundler = HtmlBundler::new(BundleOptions::from_config(config));
        Self::new(cache, compressor, bundler, config.clone())
    }
}

// == Dashboard ==
/// Handler for GET /
///
/// Serves the bundled dashboard document. A bundling failure beyond the
/// entry file degrades inside the bundler; when even bundling fails, the
/// raw entry file is served unbundled.
pub async fn dashboard_handler(State(state): State<AppState>) -> Result<Html<String>> {
    let bundled = {
        let mut bundler = state.bundler.write().await;
        bundler.create_bundle()
    };

    match bundled {
        Ok(bundle) => Ok(Html(bundle.html)),
        Err(err) => {
            warn!(error = %err, "bundling failed, serving unbundled entry file");
            let entry = state.config.static_dir.join(&state.config.entry_file);
            let html = std::fs::read_to_string(entry)?;
            Ok(Html(html))
        }
    }
}

// == Analytics ==
/// Handler for GET /api/statistics
pub async fn statistics_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    query.validate()?;
    let key = cache_key("statistics", &query);
    with_response_cache(&state, key, || {
        let (prs, _) = load_filtered(&state, &query)?;
        Ok(serde_json::to_value(calculate_pr_statistics(&prs))?)
    })
    .await
}

/// Handler for GET /api/periods
pub async fn periods_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    query.validate()?;
    let key = cache_key("periods", &query);
    let days = query.days.unwrap_or(DEFAULT_PERIOD_DAYS);
    with_response_cache(&state, key, || {
        let (prs, _) = load_filtered(&state, &query)?;
        Ok(serde_json::to_value(analyze_period_data(&prs, days))?)
    })
    .await
}

/// Handler for GET /api/reviews
pub async fn reviews_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    query.validate()?;
    let key = cache_key("reviews", &query);
    with_response_cache(&state, key, || {
        let (prs, _) = load_filtered(&state, &query)?;
        Ok(serde_json::to_value(analyze_review_efficiency(&prs))?)
    })
    .await
}

/// Handler for GET /api/contributions
pub async fn contributions_handler(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Value>> {
    query.validate()?;
    let key = cache_key("contributions", &query);
    with_response_cache(&state, key, || {
        let (prs, teams) = load_filtered(&state, &query)?;
        Ok(serde_json::to_value(analyze_team_contributions(
            &prs,
            teams.as_ref(),
        ))?)
    })
    .await
}

// == Introspection ==
/// Handler for GET /internal/cache
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let cache = state.cache.read().await;
    Json(CacheStatsResponse::from(cache.stats()))
}

/// Handler for DELETE /internal/cache
///
/// With a `pattern` query parameter, drops matching keys; without one,
/// clears the whole cache.
pub async fn cache_invalidate_handler(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> Result<Json<InvalidateResponse>> {
    let mut cache = state.cache.write().await;
    match query.pattern {
        Some(pattern) => {
            let regex = regex::Regex::new(&pattern).map_err(|err| {
                DashboardError::InvalidRequest(format!("bad pattern: {}", err))
            })?;
            let removed = cache.delete_pattern(&regex);
            Ok(Json(InvalidateResponse::removed(removed)))
        }
        None => {
            cache.clear();
            Ok(Json(InvalidateResponse::cleared()))
        }
    }
}

/// Handler for GET /internal/compression
pub async fn compression_stats_handler(
    State(state): State<AppState>,
) -> Json<CompressionStatsResponse> {
    let compressor = state.compressor.read().await;
    Json(CompressionStatsResponse::from(compressor.stats()))
}

/// Handler for GET /internal/bundle
pub async fn bundle_stats_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    let bundler = state.bundler.read().await;
    match bundler.bundle_stats() {
        Some(stats) => Ok(Json(serde_json::to_value(stats)?)),
        None => Err(DashboardError::NotFound(
            "no bundle generated yet".to_string(),
        )),
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Helpers ==
fn cache_key(namespace: &str, query: &AnalyticsQuery) -> String {
    let owned = query.key_params();
    let params: Vec<(&str, &str)> = owned
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    CacheStore::generate_key(namespace, &params)
}

/// Serves `key` from the response cache, or computes, compresses and
/// caches the result. An oversized result simply goes uncached.
async fn with_response_cache<F>(state: &AppState, key: String, produce: F) -> Result<Json<Value>>
where
    F: FnOnce() -> Result<Value>,
{
    if let Some(hit) = state.cache.write().await.get(&key) {
        let envelope: Envelope = serde_json::from_value(hit)?;
        let value = state.compressor.read().await.decompress(&envelope)?;
        return Ok(Json(value));
    }

    let value = produce()?;

    let envelope = state.compressor.write().await.compress(&value, false)?;
    let stored = serde_json::to_value(&envelope)?;
    state
        .cache
        .write()
        .await
        .set(key, stored, Some(state.config.response_ttl_ms));

    Ok(Json(value))
}

/// Loads records and team data, applies membership/bot filtering and the
/// optional repository restriction.
fn load_filtered(
    state: &AppState,
    query: &AnalyticsQuery,
) -> Result<(Vec<PrRecord>, Option<TeamData>)> {
    let records = load_pr_records(&state.config.data_dir)?;
    let teams = load_teams(&state.config.data_dir)?;

    let mut filtered = filter_non_members(&records, teams.as_ref());
    if let Some(repo) = &query.repo {
        filtered.retain(|pr| &pr.repository == repo);
    }
    Ok((filtered, teams))
}
