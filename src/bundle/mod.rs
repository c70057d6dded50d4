//! Bundle Module
//!
//! Produces a single self-contained HTML document from the dashboard's
//! entry page and its local assets.

mod bundler;
mod minify;

// Re-export public types
pub use bundler::{Bundle, BundleOptions, BundleStats, HtmlBundler, SourceFile};
pub use minify::{minify_css, minify_html, minify_js};
