//! Lightweight Minification Module
//!
//! Regex-based comment stripping and whitespace collapsing. Deliberately
//! not a real parser: malformed input degrades to (at worst) unprocessed
//! content instead of failing the bundle.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static INTER_TAG_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s+<").unwrap());
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static RUNS_OF_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static AROUND_CSS_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([{}:;,>])\s*").unwrap());

/// Strips HTML comments and collapses whitespace between tags.
pub fn minify_html(html: &str) -> String {
    let stripped = HTML_COMMENT.replace_all(html, "");
    let collapsed = INTER_TAG_WHITESPACE.replace_all(&stripped, "><");
    collapsed.trim().to_string()
}

/// Strips CSS block comments and collapses whitespace.
pub fn minify_css(css: &str) -> String {
    let stripped = BLOCK_COMMENT.replace_all(css, "");
    let collapsed = RUNS_OF_WHITESPACE.replace_all(&stripped, " ");
    let tightened = AROUND_CSS_PUNCT.replace_all(&collapsed, "$1");
    tightened.trim().to_string()
}

/// Strips JS block comments and whole-line `//` comments, drops blank lines.
///
/// Line comments are only removed when the line starts with `//`, so
/// protocol substrings inside string literals ("https://...") survive.
pub fn minify_js(js: &str) -> String {
    let stripped = BLOCK_COMMENT.replace_all(js, "");
    stripped
        .lines()
        .map(str::trim_end)
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with("//")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
