//! Request path → filesystem resolution
//!
//! Maps the raw request target onto the serving root, following the usual
//! static-server rules: directories without a trailing slash redirect,
//! directories with one resolve to their index file or a listing.

use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// A request path mapped onto the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub is_dir: bool,
    pub exists: bool,
}

/// Outcome of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Directory requested without a trailing slash
    Redirect { location: String },
    /// Regular file to serve (possibly a directory's index file)
    File(ResolvedTarget),
    /// Directory without an index file
    Listing(ResolvedTarget),
    /// Nothing servable at this path
    NotFound,
}

/// Split a raw request target into path and query, dropping any fragment
pub fn split_query(raw: &str) -> (&str, Option<&str>) {
    let raw = raw.split('#').next().unwrap_or(raw);
    match raw.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (raw, None),
    }
}

/// Resolves request paths against a fixed, canonical root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    index: Vec<String>,
}

impl PathResolver {
    /// Create a resolver. `root` must already be canonical.
    pub fn new(root: impl Into<PathBuf>, index: Vec<String>) -> Self {
        Self {
            root: root.into(),
            index,
        }
    }

    /// The serving root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a raw request target to its filesystem target without applying any policy
    pub async fn target(&self, raw_path: &str) -> ResolvedTarget {
        let (path, _) = split_query(raw_path);
        let (fs_path, metadata) = self.lookup(path).await;
        ResolvedTarget {
            is_dir: metadata.as_ref().is_some_and(|m| m.is_dir()),
            exists: metadata.is_some(),
            path: fs_path,
        }
    }

    /// Resolve a raw request target (path plus optional query)
    pub async fn resolve(&self, raw_path: &str) -> Resolution {
        let (path, query) = split_query(raw_path);
        let (fs_path, metadata) = self.lookup(path).await;

        let Some(metadata) = metadata else {
            return Resolution::NotFound;
        };

        if !self.within_root(&fs_path).await {
            tracing::warn!("Refusing {} -> {:?}: outside serving root", path, fs_path);
            return Resolution::NotFound;
        }

        if metadata.is_dir() {
            if !path.ends_with('/') {
                let mut location = format!("{}/", path);
                if let Some(query) = query {
                    location.push('?');
                    location.push_str(query);
                }
                return Resolution::Redirect { location };
            }

            for index in &self.index {
                let candidate = fs_path.join(index);
                if let Ok(meta) = tokio::fs::metadata(&candidate).await {
                    if meta.is_file() {
                        tracing::debug!("📁 {} -> index {:?}", path, candidate);
                        return Resolution::File(ResolvedTarget {
                            path: candidate,
                            is_dir: false,
                            exists: true,
                        });
                    }
                }
            }

            return Resolution::Listing(ResolvedTarget {
                path: fs_path,
                is_dir: true,
                exists: true,
            });
        }

        // "file.txt/" names a directory that isn't one
        if metadata.is_file() && !path.ends_with('/') {
            Resolution::File(ResolvedTarget {
                path: fs_path,
                is_dir: false,
                exists: true,
            })
        } else {
            Resolution::NotFound
        }
    }

    /// Normalise the decoded path and join it onto the root.
    ///
    /// `..` pops the previous segment and stops at the root; `.` and empty
    /// segments are skipped.
    fn fs_path(&self, path: &str) -> PathBuf {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let mut segments: Vec<&str> = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s if is_plain_segment(s) => segments.push(s),
                _ => {}
            }
        }

        let mut fs_path = self.root.clone();
        fs_path.extend(segments);
        fs_path
    }

    async fn lookup(&self, path: &str) -> (PathBuf, Option<Metadata>) {
        let fs_path = self.fs_path(path);
        let metadata = tokio::fs::metadata(&fs_path).await.ok();
        (fs_path, metadata)
    }

    /// Symlinks may still point outside the root; check the canonical form.
    async fn within_root(&self, path: &Path) -> bool {
        match tokio::fs::canonicalize(path).await {
            Ok(canonical) => canonical.starts_with(&self.root),
            Err(_) => false,
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.is_empty() || segment == "." || segment == ".." {
        return false;
    }
    if segment.contains('\\') || segment.contains('\0') {
        return false;
    }
    !(cfg!(windows) && segment.contains(':'))
}
