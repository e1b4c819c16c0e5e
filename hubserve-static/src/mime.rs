//! MIME type handling

/// Fallback for extensions nobody knows about
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Get MIME type for a file path, by extension only
pub fn guess_mime_type(path: &str) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(guess_mime_type("index.html"), "text/html");
        assert_eq!(guess_mime_type("style.css"), "text/css");
        assert_eq!(guess_mime_type("app.js"), "text/javascript");
        assert_eq!(guess_mime_type("/data/report.JSON"), "application/json");
    }

    #[test]
    fn test_unknown_is_octet_stream() {
        assert_eq!(guess_mime_type("blob.unknownext"), OCTET_STREAM);
        assert_eq!(guess_mime_type("Makefile"), OCTET_STREAM);
    }
}
