//! Per-request orchestration
//!
//! `RESOLVE → {REDIRECT | LIST | NOT_FOUND | SERVE}`, then header augmentation
//! on the way out. Every failure becomes an HTTP status here; nothing escapes
//! to the connection as an error.

use crate::compress::Compressor;
use crate::listing::{DirectoryLister, HtmlDirectoryLister};
use crate::mime::guess_mime_type;
use crate::plan::ResponsePlan;
use crate::policy::ResponsePolicy;
use crate::resolver::{PathResolver, Resolution, split_query};
use bytes::Bytes;
use http::header::ACCEPT_ENCODING;
use http::{Method, Request, Response, StatusCode};
use http_body_util::Full;
use hubserve_core::Result;
use hubserve_core::config::HubserveConfig;
use std::path::Path;
use std::sync::Arc;

/// Static file request handler
pub struct RequestHandler {
    resolver: PathResolver,
    compressor: Compressor,
    lister: Arc<dyn DirectoryLister>,
}

impl RequestHandler {
    /// Create a handler with the default HTML directory lister
    pub fn new(resolver: PathResolver, compressor: Compressor) -> Self {
        Self {
            resolver,
            compressor,
            lister: Arc::new(HtmlDirectoryLister),
        }
    }

    /// Build a handler from the runtime configuration. Fails if the root is missing.
    pub fn from_config(config: &HubserveConfig) -> Result<Self> {
        let root = config.canonical_root()?;
        Ok(Self::new(
            PathResolver::new(root, config.index.clone()),
            Compressor::new(config.compression),
        ))
    }

    /// Replace the directory lister
    pub fn with_lister(mut self, lister: Arc<dyn DirectoryLister>) -> Self {
        self.lister = lister;
        self
    }

    /// The canonical serving root
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// Handle one request. Never fails: errors are turned into error responses.
    pub async fn handle<B>(&self, req: &Request<B>) -> Response<Full<Bytes>> {
        let raw = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let head_only = req.method() == Method::HEAD;

        let method = req.method();
        let plan = if method == Method::GET || head_only {
            let accept_encoding = req
                .headers()
                .get(ACCEPT_ENCODING)
                .and_then(|v| v.to_str().ok());
            self.plan(raw, accept_encoding).await
        } else {
            tracing::warn!("code 501, unsupported method {}", method);
            ResponsePlan::not_implemented(method.as_str()).cache_for(split_query(raw).0)
        };

        plan.into_response(req.version(), head_only)
    }

    /// Run the resolve/serve state machine for a GET (or HEAD) request
    pub async fn plan(&self, raw: &str, accept_encoding: Option<&str>) -> ResponsePlan {
        let (path, _) = split_query(raw);

        match self.resolver.resolve(raw).await {
            Resolution::Redirect { location } => {
                tracing::debug!("↪️ {} -> {}", raw, location);
                ResponsePlan::redirect(location).cache_for(path)
            }
            Resolution::NotFound => {
                tracing::warn!("code 404, File not found: {}", path);
                ResponsePlan::not_found().cache_for(path)
            }
            Resolution::Listing(target) => match self.lister.list(&target.path, path).await {
                Ok(plan) => plan.cache_for(path),
                Err(e) => {
                    tracing::warn!("code 404, cannot list {}: {}", target.path.display(), e);
                    ResponsePlan::error(StatusCode::NOT_FOUND, "No permission to list directory")
                        .cache_for(path)
                }
            },
            Resolution::File(target) => self.serve_file(raw, &target.path, accept_encoding).await,
        }
    }

    async fn serve_file(&self, raw: &str, file: &Path, accept_encoding: Option<&str>) -> ResponsePlan {
        let content = match tokio::fs::read(file).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Error serving {}: {}", raw, e);
                return ResponsePlan::internal_error(&format!("Internal server error: {}", e))
                    .cache_for(split_query(raw).0);
            }
        };

        // Policy follows the request path; only the content type comes from the file
        let decision = ResponsePolicy::for_path(split_query(raw).0);
        let content_type = guess_mime_type(&file.to_string_lossy());
        let mut plan = ResponsePlan::with_body(StatusCode::OK, content_type, content);
        plan.cache_control = decision.cache_control;

        if decision.compressible && Compressor::accepts_gzip(accept_encoding) {
            match self.compressor.compress_if_smaller(&plan.body).await {
                Ok(Some(compressed)) => {
                    tracing::debug!(
                        "🗜️ {} gzipped {} -> {} bytes",
                        raw,
                        plan.body.len(),
                        compressed.len()
                    );
                    plan = plan.gzipped(compressed);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("gzip failed for {}, sending identity: {}", raw, e),
            }
        }

        plan
    }
}
