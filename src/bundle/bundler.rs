//! HTML Bundler Module
//!
//! Combines an entry HTML document with its referenced local stylesheets,
//! scripts and (optionally) images into one self-contained page, memoized
//! against source file modification times.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::bundle::minify::{minify_css, minify_html, minify_js};
use crate::config::Config;
use crate::error::{DashboardError, Result};

static LINK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<link\b[^>]*?href=["'](?P<href>[^"']+)["'][^>]*>"#).unwrap());
static SCRIPT_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<script\b[^>]*?src=["'](?P<src>[^"']+)["'][^>]*>\s*</script>"#).unwrap()
});
static IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?P<pre><img\b[^>]*?src=["'])(?P<src>[^"']+)(?P<post>["'])"#).unwrap()
});
static CSS_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"url\(\s*["']?(?P<src>[^"')]+?)["']?\s*\)"#).unwrap());

// == Options ==
/// Bundler configuration, usually derived from [`Config`].
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Directory containing the entry document and its assets
    pub root: PathBuf,
    /// Entry HTML file name, relative to `root`
    pub entry: String,
    /// Minify inlined HTML/CSS/JS content
    pub minify: bool,
    /// Inline local images as base64 data URIs
    pub inline_images: bool,
}

impl BundleOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.static_dir.clone(),
            entry: config.entry_file.clone(),
            minify: config.minify,
            inline_images: config.inline_images,
        }
    }
}

// == Bundle ==
/// A contributing source file's identity at generation time.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub size: u64,
    pub mtime: SystemTime,
}

/// A generated bundle plus the inputs it was built from.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub html: String,
    pub generated_at: SystemTime,
    pub sources: Vec<SourceFile>,
}

/// Informational size comparison for the current bundle.
#[derive(Debug, Clone, Serialize)]
pub struct BundleStats {
    pub source_file_count: usize,
    pub original_bytes: u64,
    pub bundled_bytes: usize,
    pub percent_reduction: f64,
}

// == HTML Bundler ==
/// Memoizing bundler over a static asset directory.
#[derive(Debug)]
pub struct HtmlBundler {
    options: BundleOptions,
    cached: Option<Bundle>,
}

impl HtmlBundler {
    pub fn new(options: BundleOptions) -> Self {
        Self {
            options,
            cached: None,
        }
    }

    // == Create Bundle ==
    /// Returns the bundled document, rebuilding only when a source file
    /// changed since the cached bundle was generated.
    ///
    /// Only a failure to read the entry document is fatal; every per-asset
    /// failure leaves the original reference in place with a warning.
    pub fn create_bundle(&mut self) -> Result<Bundle> {
        if let Some(bundle) = &self.cached {
            if !Self::is_stale(bundle) {
                debug!("serving cached bundle");
                return Ok(bundle.clone());
            }
            info!("bundle sources changed, regenerating");
        }

        let bundle = self.build()?;
        self.cached = Some(bundle.clone());
        Ok(bundle)
    }

    /// Forces the next `create_bundle` call to regenerate.
    pub fn clear_cache(&mut self) {
        self.cached = None;
    }

    // == Bundle Stats ==
    /// Size comparison between the source files and the bundled output.
    /// `None` until a bundle has been generated.
    pub fn bundle_stats(&self) -> Option<BundleStats> {
        let bundle = self.cached.as_ref()?;
        let original_bytes: u64 = bundle.sources.iter().map(|s| s.size).sum();
        let bundled_bytes = bundle.html.len();
        let percent_reduction = if original_bytes == 0 {
            0.0
        } else {
            let saved = (1.0 - bundled_bytes as f64 / original_bytes as f64) * 100.0;
            (saved * 10.0).round() / 10.0
        };
        Some(BundleStats {
            source_file_count: bundle.sources.len(),
            original_bytes,
            bundled_bytes,
            percent_reduction,
        })
    }

    // A bundle is stale once any recorded source is newer than the bundle,
    // or can no longer be stat'ed.
    fn is_stale(bundle: &Bundle) -> bool {
        bundle.sources.iter().any(|source| {
            match fs::metadata(&source.path).and_then(|meta| meta.modified()) {
                Ok(mtime) => mtime > bundle.generated_at,
                Err(_) => true,
            }
        })
    }

    fn build(&self) -> Result<Bundle> {
        let entry_path = self.options.root.join(&self.options.entry);
        let html = fs::read_to_string(&entry_path).map_err(|err| {
            DashboardError::Bundle(format!("entry {}: {}", entry_path.display(), err))
        })?;

        let mut sources = Vec::new();
        Self::record_source(&entry_path, &mut sources);

        let html = self.inline_stylesheets(&html, &mut sources);
        let html = self.inline_scripts(&html, &mut sources);
        let html = if self.options.inline_images {
            self.inline_images(&html, &mut sources)
        } else {
            html
        };

        let mut html = if self.options.minify {
            minify_html(&html)
        } else {
            html
        };
        html.push_str(&format!(
            "\n<!-- bundled {} -->\n",
            chrono::Utc::now().to_rfc3339()
        ));

        info!(
            sources = sources.len(),
            bytes = html.len(),
            "generated bundle"
        );
        Ok(Bundle {
            html,
            generated_at: SystemTime::now(),
            sources,
        })
    }

    fn inline_stylesheets(&self, html: &str, sources: &mut Vec<SourceFile>) -> String {
        LINK_TAG
            .replace_all(html, |caps: &Captures| {
                let tag = &caps[0];
                let href = &caps["href"];
                if !tag.contains("stylesheet") || Self::is_external(href) {
                    return tag.to_string();
                }
                match self.read_asset(href, sources) {
                    Ok(css) => {
                        let css = if self.options.inline_images {
                            self.inline_css_images(&css, sources)
                        } else {
                            css
                        };
                        let css = if self.options.minify {
                            minify_css(&css)
                        } else {
                            css
                        };
                        format!("<style>{}</style>", css)
                    }
                    Err(err) => {
                        warn!(href, error = %err, "failed to inline stylesheet, keeping reference");
                        tag.to_string()
                    }
                }
            })
            .into_owned()
    }

    fn inline_scripts(&self, html: &str, sources: &mut Vec<SourceFile>) -> String {
        SCRIPT_TAG
            .replace_all(html, |caps: &Captures| {
                let tag = &caps[0];
                let src = &caps["src"];
                if Self::is_external(src) {
                    return tag.to_string();
                }
                match self.read_asset(src, sources) {
                    Ok(js) => {
                        let js = if self.options.minify { minify_js(&js) } else { js };
                        format!("<script>{}</script>", js)
                    }
                    Err(err) => {
                        warn!(src, error = %err, "failed to inline script, keeping reference");
                        tag.to_string()
                    }
                }
            })
            .into_owned()
    }

    fn inline_images(&self, html: &str, sources: &mut Vec<SourceFile>) -> String {
        IMG_SRC
            .replace_all(html, |caps: &Captures| {
                let src = &caps["src"];
                if Self::is_external(src) || src.starts_with("data:") {
                    return caps[0].to_string();
                }
                match self.read_asset_bytes(src, sources) {
                    Ok(bytes) => format!(
                        "{}{}{}",
                        &caps["pre"],
                        Self::data_uri(src, &bytes),
                        &caps["post"]
                    ),
                    Err(err) => {
                        warn!(src, error = %err, "failed to inline image, keeping reference");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    // Inlines url(...) references in CSS, e.g. background-image declarations.
    fn inline_css_images(&self, css: &str, sources: &mut Vec<SourceFile>) -> String {
        CSS_URL
            .replace_all(css, |caps: &Captures| {
                let src = &caps["src"];
                if Self::is_external(src) || src.starts_with("data:") {
                    return caps[0].to_string();
                }
                match self.read_asset_bytes(src, sources) {
                    Ok(bytes) => format!("url({})", Self::data_uri(src, &bytes)),
                    Err(err) => {
                        warn!(src, error = %err, "failed to inline CSS image, keeping reference");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    fn read_asset(&self, reference: &str, sources: &mut Vec<SourceFile>) -> std::io::Result<String> {
        let path = self.resolve(reference);
        let content = fs::read_to_string(&path)?;
        Self::record_source(&path, sources);
        Ok(content)
    }

    fn read_asset_bytes(
        &self,
        reference: &str,
        sources: &mut Vec<SourceFile>,
    ) -> std::io::Result<Vec<u8>> {
        let path = self.resolve(reference);
        let bytes = fs::read(&path)?;
        Self::record_source(&path, sources);
        Ok(bytes)
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let trimmed = reference
            .trim_start_matches("./")
            .trim_start_matches('/');
        self.options.root.join(trimmed)
    }

    fn record_source(path: &Path, sources: &mut Vec<SourceFile>) {
        if let Ok(meta) = fs::metadata(path) {
            if let Ok(mtime) = meta.modified() {
                sources.push(SourceFile {
                    path: path.to_path_buf(),
                    size: meta.len(),
                    mtime,
                });
            }
        }
    }

    // http://, https:// and protocol-relative references stay untouched;
    // bundling removes same-origin round trips, not third-party assets.
    fn is_external(reference: &str) -> bool {
        reference.starts_with("http://")
            || reference.starts_with("https://")
            || reference.starts_with("//")
    }

    fn data_uri(reference: &str, bytes: &[u8]) -> String {
        use base64::engine::general_purpose::STANDARD as BASE64;
        use base64::Engine as _;

        let mime = match Path::new(reference)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            Some("ico") => "image/x-icon",
            _ => "application/octet-stream",
        };
        format!("data:{};base64,{}", mime, BASE64.encode(bytes))
    }
}
