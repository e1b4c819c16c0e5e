//! Per-resource caching and compression policy
//!
//! Both decisions are pure functions of the path string; file contents are
//! never inspected.

use crate::mime::guess_mime_type;

/// `Cache-Control` for static assets
pub const CACHE_LONG: &str = "public, max-age=3600";

/// `Cache-Control` for everything else, HTML included
pub const CACHE_SHORT: &str = "public, max-age=60";

/// Extensions allowed to be cached for an hour
const CACHEABLE_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".woff", ".woff2", ".ttf", ".eot",
    ".ico",
];

/// MIME types worth gzipping
const COMPRESSIBLE_TYPES: &[&str] = &[
    "text/html",
    "text/css",
    "text/javascript",
    "application/javascript",
    "application/json",
    "text/xml",
    "application/xml",
    "text/plain",
];

/// Policy outcome for a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyDecision {
    pub cache_control: &'static str,
    pub compressible: bool,
}

/// Caching and compression rules
pub struct ResponsePolicy;

impl ResponsePolicy {
    /// Evaluate both rules for a path
    pub fn for_path(path: &str) -> PolicyDecision {
        PolicyDecision {
            cache_control: Self::cache_control(path),
            compressible: Self::is_compressible(path),
        }
    }

    /// `Cache-Control` value for a path (case-insensitive extension match)
    pub fn cache_control(path: &str) -> &'static str {
        let lower = path.to_ascii_lowercase();
        if CACHEABLE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
            CACHE_LONG
        } else {
            CACHE_SHORT
        }
    }

    /// Whether the MIME type inferred from the path is on the compression allow-list
    pub fn is_compressible(path: &str) -> bool {
        COMPRESSIBLE_TYPES.contains(&guess_mime_type(path))
    }
}
