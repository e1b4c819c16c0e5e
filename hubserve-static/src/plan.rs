//! Response plans
//!
//! A [`ResponsePlan`] is built completely before anything reaches the wire,
//! then turned into a `hyper` response in one go. Header augmentation
//! (`Cache-Control`, CORS, keep-alive) happens here so every response path
//! gets it.

use crate::listing::html_escape;
use crate::policy::{CACHE_SHORT, ResponsePolicy};
use bytes::Bytes;
use http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_ENCODING, CONTENT_LENGTH,
    CONTENT_TYPE, HeaderName, LOCATION,
};
use http::{Response, StatusCode, Version};
use http_body_util::Full;

/// Content type for generated HTML (errors, listings)
pub const HTML_UTF8: &str = "text/html; charset=utf-8";

/// Everything needed to emit one response
#[derive(Debug, Clone)]
pub struct ResponsePlan {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub content_encoding: Option<&'static str>,
    pub cache_control: &'static str,
    pub headers: Vec<(HeaderName, String)>,
}

impl ResponsePlan {
    /// Create an empty response with status code
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            body: Bytes::new(),
            content_encoding: None,
            cache_control: CACHE_SHORT,
            headers: Vec::new(),
        }
    }

    /// Create a response with body
    pub fn with_body(status: StatusCode, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            body: body.into(),
            ..Self::status(status)
        }
    }

    /// Create redirect response
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::status(StatusCode::MOVED_PERMANENTLY).header(LOCATION, location)
    }

    /// Create an HTML error page
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = format!(
            "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Error response</title>\n</head>\n<body>\n<h1>Error response</h1>\n\
             <p>Error code: {}</p>\n<p>Message: {}.</p>\n</body>\n</html>\n",
            status.as_u16(),
            html_escape(message)
        );
        Self::with_body(status, HTML_UTF8, body)
    }

    /// Create not found response
    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND, "File not found")
    }

    /// Create internal server error response
    pub fn internal_error(message: &str) -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create the response for methods other than GET and HEAD
    pub fn not_implemented(method: &str) -> Self {
        Self::error(StatusCode::NOT_IMPLEMENTED, &format!("Unsupported method ('{}')", method))
    }

    /// Add a header
    pub fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Apply the caching policy for `path`
    pub fn cache_for(mut self, path: &str) -> Self {
        self.cache_control = ResponsePolicy::cache_control(path);
        self
    }

    /// Swap the body for its gzip encoding
    pub fn gzipped(mut self, compressed: Vec<u8>) -> Self {
        self.body = Bytes::from(compressed);
        self.content_encoding = Some(crate::compress::GZIP);
        self
    }

    /// Build the final response. `head_only` drops the body but keeps `Content-Length`.
    pub fn into_response(self, version: Version, head_only: bool) -> Response<Full<Bytes>> {
        let mut builder = Response::builder()
            .status(self.status)
            .header(CACHE_CONTROL, self.cache_control)
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*");

        if let Some(content_type) = &self.content_type {
            builder = builder.header(CONTENT_TYPE, content_type.as_str());
        }
        if let Some(encoding) = self.content_encoding {
            builder = builder.header(CONTENT_ENCODING, encoding);
        }
        builder = builder.header(CONTENT_LENGTH, self.body.len().to_string());
        if version >= Version::HTTP_11 {
            builder = builder.header(CONNECTION, "keep-alive");
        }
        for (name, value) in &self.headers {
            builder = builder.header(name.clone(), value.as_str());
        }

        let body = if head_only { Bytes::new() } else { self.body };
        builder.body(Full::new(body)).unwrap_or_else(|e| {
            tracing::error!("Failed to build response: {}", e);
            let mut response = Response::new(Full::new(Bytes::from_static(b"Internal Server Error")));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CACHE_LONG;

    #[test]
    fn test_redirect_plan() {
        let response = ResponsePlan::redirect("/docs/").into_response(Version::HTTP_11, false);
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/docs/");
        assert_eq!(response.headers()[CONTENT_LENGTH], "0");
    }

    #[test]
    fn test_augmented_headers() {
        let response = ResponsePlan::with_body(StatusCode::OK, "text/css", "a{}")
            .cache_for("/style.css")
            .into_response(Version::HTTP_11, false);
        let headers = response.headers();
        assert_eq!(headers[CACHE_CONTROL], CACHE_LONG);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[CONNECTION], "keep-alive");
        assert_eq!(headers[CONTENT_TYPE], "text/css");
        assert_eq!(headers[CONTENT_LENGTH], "3");
        assert!(headers.get(CONTENT_ENCODING).is_none());
    }

    #[test]
    fn test_no_keep_alive_for_http10() {
        let response = ResponsePlan::not_found().into_response(Version::HTTP_10, false);
        assert!(response.headers().get(CONNECTION).is_none());
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[CACHE_CONTROL], CACHE_SHORT);
    }

    #[test]
    fn test_error_page_escapes_message() {
        let plan = ResponsePlan::error(StatusCode::NOT_FOUND, "<script>");
        let body = String::from_utf8(plan.body.to_vec()).unwrap();
        assert!(body.contains("Error code: 404"));
        assert!(body.contains("&lt;script&gt;"));
        assert_eq!(plan.content_type.as_deref(), Some(HTML_UTF8));
    }

    #[test]
    fn test_gzipped_sets_encoding() {
        let plan = ResponsePlan::with_body(StatusCode::OK, "text/plain", "xxxx").gzipped(vec![1, 2]);
        let response = plan.into_response(Version::HTTP_11, false);
        assert_eq!(response.headers()[CONTENT_ENCODING], "gzip");
        assert_eq!(response.headers()[CONTENT_LENGTH], "2");
    }
}
