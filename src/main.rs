//! prboard - Pull-request dashboard backend
//!
//! Serves cached PR analytics and a bundled dashboard page.

mod analytics;
mod api;
mod bundle;
mod cache;
mod compress;
mod config;
mod error;
mod models;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_sweep_task;

#[tokio::main]
async fn main() {
    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        cache_max_bytes = config.cache_max_bytes,
        response_ttl_ms = config.response_ttl_ms,
        sweep_interval_secs = config.sweep_interval,
        data_dir = %config.data_dir.display(),
        static_dir = %config.static_dir.display(),
        "starting dashboard backend"
    );

    let state = AppState::from_config(&config);

    // Warm the bundle so the first page request does not pay for it.
    // A failure here is not fatal: the handler retries per request and
    // falls back to the unbundled entry file.
    match state.bundler.write().await.create_bundle() {
        Ok(bundle) => info!(
            sources = bundle.sources.len(),
            bytes = bundle.html.len(),
            "dashboard bundle warmed"
        ),
        Err(err) => warn!(error = %err, "could not warm dashboard bundle"),
    }

    let sweep_handle = spawn_sweep_task(state.cache.clone(), config.sweep_interval);

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            warn!(error = %err, %addr, "failed to bind, exiting");
            std::process::exit(1);
        }
    };
    info!("listening on http://{}", addr);

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        warn!(error = %err, "server error");
    }

    sweep_handle.abort();
    info!("shutdown complete");
}

/// Resolves once SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
