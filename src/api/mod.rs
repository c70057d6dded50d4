//! API Module
//!
//! HTTP surface: thin glue dispatching requests to the cache, compressor,
//! bundler and analytics modules.

mod handlers;
mod routes;

pub use handlers::AppState;
pub use routes::create_router;
