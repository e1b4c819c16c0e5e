//! Configuration loader

use super::HubserveConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration loader for JSON and TOML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<HubserveConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        tracing::debug!("Loading {} config from {}", ext, path.display());

        match ext {
            "json" => Self::from_json(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(Error::Config(format!("Unknown config format: '{}'", ext))),
        }
    }

    /// Parse JSON configuration
    pub fn from_json(content: &str) -> Result<HubserveConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML configuration
    pub fn from_toml(content: &str) -> Result<HubserveConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_loading() {
        let json = r#"{"port": 9000}"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_toml_loading() {
        let toml = r#"
            host = "127.0.0.1"
            root = "public"
            open_browser = false

            [logging]
            level = "debug"
        "#;
        let config = ConfigLoader::from_toml(toml).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.root, std::path::PathBuf::from("public"));
        assert!(!config.open_browser);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hubserve.toml");
        std::fs::write(&path, "port = 4000\n").unwrap();
        assert_eq!(ConfigLoader::load(&path).unwrap().port, 4000);

        let yaml = dir.path().join("hubserve.yaml");
        std::fs::write(&yaml, "port: 4000\n").unwrap();
        assert!(matches!(ConfigLoader::load(&yaml), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(ConfigLoader::from_json("{ port: }"), Err(Error::Config(_))));
    }
}
