//! Configuration type definitions
//!
//! These types represent the runtime configuration for Hubserve. A config is
//! built once at startup and shared immutably afterwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for Hubserve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubserveConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory to serve
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Index files probed inside directories, in order
    #[serde(default = "default_index")]
    pub index: Vec<String>,

    /// On-the-fly gzip level
    #[serde(default)]
    pub compression: CompressionLevel,

    /// Open a browser tab once the server is up
    #[serde(default = "default_bool_true")]
    pub open_browser: bool,

    /// Seconds to wait for in-flight connections on shutdown
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_index() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_bool_true() -> bool {
    true
}

fn default_shutdown_grace() -> u64 {
    5
}

impl Default for HubserveConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
            index: default_index(),
            compression: CompressionLevel::default(),
            open_browser: true,
            shutdown_grace_secs: default_shutdown_grace(),
            logging: LoggingConfig::default(),
        }
    }
}

impl HubserveConfig {
    /// Resolve `host:port` into a socket address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| Error::Config(format!("Invalid address '{}:{}': {}", self.host, self.port, e)))?
            .next()
            .ok_or_else(|| Error::Config(format!("Address '{}:{}' resolved to nothing", self.host, self.port)))
    }

    /// Check that the serving root is an existing directory and return its canonical path
    pub fn canonical_root(&self) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(Error::RootMissing(self.root.clone()));
        }
        std::fs::canonicalize(&self.root).map_err(|_| Error::RootMissing(self.root.clone()))
    }

    /// Grace period for in-flight connections during shutdown
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Compression level for on-the-fly gzip
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLevel {
    /// No compression
    None,
    /// Fast compression, favours latency over ratio
    #[default]
    Fast,
    /// Default compression
    Default,
    /// Best compression (slower)
    Best,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log filter directive used when `RUST_LOG` is unset (e.g. "info", "hubserve=debug")
    #[serde(default)]
    pub level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HubserveConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.index, vec!["index.html", "index.htm"]);
        assert_eq!(config.compression, CompressionLevel::Fast);
        assert!(config.open_browser);
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
    }

    #[test]
    fn test_json_deserialize_partial() {
        let json = r#"{ "port": 8081, "compression": "best" }"#;
        let config: HubserveConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.compression, CompressionLevel::Best);
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = HubserveConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr().unwrap(), "127.0.0.1:8080".parse().unwrap());
    }

    #[test]
    fn test_canonical_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = HubserveConfig {
            root: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(config.canonical_root().unwrap(), dir.path().canonicalize().unwrap());

        let missing = HubserveConfig {
            root: dir.path().join("missing"),
            ..Default::default()
        };
        assert!(matches!(missing.canonical_root(), Err(Error::RootMissing(_))));
    }
}
