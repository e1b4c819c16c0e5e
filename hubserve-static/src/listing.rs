//! Directory listings for directories without an index file

use crate::plan::{HTML_UTF8, ResponsePlan};
use async_trait::async_trait;
use http::StatusCode;
use hubserve_core::Result;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::path::Path;

/// Characters escaped in listing hrefs
const HREF: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Renders a directory when no index file exists
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// List `dir`, which was reached through `request_path` (query already stripped)
    async fn list(&self, dir: &Path, request_path: &str) -> Result<ResponsePlan>;
}

/// Plain HTML listing, one link per entry
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlDirectoryLister;

#[async_trait]
impl DirectoryLister for HtmlDirectoryLister {
    async fn list(&self, dir: &Path, request_path: &str) -> Result<ResponsePlan> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let file_type = entry.file_type().await?;
            let is_link = file_type.is_symlink();
            let is_dir = if is_link {
                tokio::fs::metadata(entry.path()).await.map(|m| m.is_dir()).unwrap_or(false)
            } else {
                file_type.is_dir()
            };
            names.push((name, is_dir, is_link));
        }
        names.sort_by_key(|(name, _, _)| name.to_lowercase());

        let display_path = html_escape(&percent_decode_str(request_path).decode_utf8_lossy());
        let mut html = format!(
            "<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Directory listing for {0}</title>\n</head>\n<body>\n\
             <h1>Directory listing for {0}</h1>\n<hr>\n<ul>\n",
            display_path
        );

        for (name, is_dir, is_link) in &names {
            let mut href = utf8_percent_encode(name, HREF).to_string();
            let mut display = html_escape(name);
            if *is_dir {
                href.push('/');
                display.push('/');
            }
            if *is_link {
                display.push('@');
            }
            html.push_str(&format!("<li><a href=\"{}\">{}</a></li>\n", href, display));
        }

        html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
        tracing::debug!("📁 Listed {} entries in {}", names.len(), dir.display());
        Ok(ResponsePlan::with_body(StatusCode::OK, HTML_UTF8, html))
    }
}

/// Escape text for inclusion in HTML
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#x27;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[tokio::test]
    async fn test_listing_sorted_with_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b file.txt"), "b").unwrap();
        std::fs::write(dir.path().join("A.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();

        let plan = HtmlDirectoryLister.list(dir.path(), "/assets/").await.unwrap();
        assert_eq!(plan.status, StatusCode::OK);
        assert_eq!(plan.content_type.as_deref(), Some(HTML_UTF8));

        let html = String::from_utf8(plan.body.to_vec()).unwrap();
        assert!(html.contains("<title>Directory listing for /assets/</title>"));
        assert!(html.contains("<li><a href=\"b%20file.txt\">b file.txt</a></li>"));
        assert!(html.contains("<li><a href=\"css/\">css/</a></li>"));

        let a = html.find("A.txt").unwrap();
        let b = html.find("b file.txt").unwrap();
        let css = html.find("css/").unwrap();
        assert!(a < b && b < css);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listing_marks_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("target.txt"), "t").unwrap();
        std::os::unix::fs::symlink(dir.path().join("target.txt"), dir.path().join("link.txt")).unwrap();

        let plan = HtmlDirectoryLister.list(dir.path(), "/").await.unwrap();
        let html = String::from_utf8(plan.body.to_vec()).unwrap();
        assert!(html.contains("<a href=\"link.txt\">link.txt@</a>"));
    }

    #[tokio::test]
    async fn test_listing_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HtmlDirectoryLister.list(&dir.path().join("gone"), "/gone/").await.is_err());
    }
}
