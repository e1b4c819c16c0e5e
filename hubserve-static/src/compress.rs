//! Compression support

use async_compression::Level;
use async_compression::tokio::write::GzipEncoder;
use hubserve_core::config::CompressionLevel;
use tokio::io::AsyncWriteExt;

/// Content-Encoding token for gzip
pub const GZIP: &str = "gzip";

/// On-the-fly gzip encoder
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    level: CompressionLevel,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressionLevel::Fast)
    }
}

impl Compressor {
    /// Create a compressor with the given level
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }

    /// Whether compression is switched on at all
    pub fn enabled(&self) -> bool {
        self.level != CompressionLevel::None
    }

    /// Whether the client advertises gzip. Substring match, like most quick servers do.
    pub fn accepts_gzip(accept_encoding: Option<&str>) -> bool {
        accept_encoding.is_some_and(|h| h.contains(GZIP))
    }

    /// Gzip-encode `input`
    pub async fn gzip(&self, input: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = GzipEncoder::with_quality(Vec::new(), self.quality());
        encoder.write_all(input).await?;
        encoder.shutdown().await?;
        Ok(encoder.into_inner())
    }

    /// Gzip-encode `input`, keeping the result only if it is strictly smaller
    pub async fn compress_if_smaller(&self, input: &[u8]) -> std::io::Result<Option<Vec<u8>>> {
        if !self.enabled() {
            return Ok(None);
        }
        let compressed = self.gzip(input).await?;
        if compressed.len() < input.len() {
            Ok(Some(compressed))
        } else {
            tracing::debug!(
                "Discarding gzip output ({} bytes >= {} bytes original)",
                compressed.len(),
                input.len()
            );
            Ok(None)
        }
    }

    fn quality(&self) -> Level {
        match self.level {
            CompressionLevel::Fast | CompressionLevel::None => Level::Fastest,
            CompressionLevel::Default => Level::Default,
            CompressionLevel::Best => Level::Best,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn gunzip(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_accepts_gzip() {
        assert!(Compressor::accepts_gzip(Some("gzip")));
        assert!(Compressor::accepts_gzip(Some("br, gzip;q=0.8, deflate")));
        assert!(!Compressor::accepts_gzip(Some("br, deflate")));
        assert!(!Compressor::accepts_gzip(Some("")));
        assert!(!Compressor::accepts_gzip(None));
    }

    #[tokio::test]
    async fn test_gzip_round_trip() {
        let input = "body { color: red; }\n".repeat(50);
        let compressed = Compressor::default().gzip(input.as_bytes()).await.unwrap();
        assert_eq!(gunzip(&compressed), input.as_bytes());
    }

    #[tokio::test]
    async fn test_gzip_is_deterministic() {
        let input = b"hello hello hello hello hello hello";
        let compressor = Compressor::default();
        let a = compressor.gzip(input).await.unwrap();
        let b = compressor.gzip(input).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_small_input_is_not_kept() {
        // gzip framing alone is ~20 bytes
        let out = Compressor::default().compress_if_smaller(b"<p>hi</p>").await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_repetitive_input_is_kept() {
        let input = "Hubserve Compression Test ".repeat(100);
        let out = Compressor::default()
            .compress_if_smaller(input.as_bytes())
            .await
            .unwrap()
            .expect("repetitive text should shrink");
        assert!(out.len() < input.len());
        assert_eq!(gunzip(&out), input.as_bytes());
    }

    #[tokio::test]
    async fn test_disabled_compressor() {
        let compressor = Compressor::new(CompressionLevel::None);
        assert!(!compressor.enabled());
        let input = "a".repeat(1000);
        assert!(compressor.compress_if_smaller(input.as_bytes()).await.unwrap().is_none());
    }
}
