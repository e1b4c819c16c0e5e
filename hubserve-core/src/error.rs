//! Error types for Hubserve

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for Hubserve operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Hubserve
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serving root does not exist or is not a directory
    #[error("Directory {} does not exist", .0.display())]
    RootMissing(PathBuf),

    /// Listening address is already bound by another socket
    #[error("Address {addr} is already in use")]
    AddrInUse { addr: SocketAddr },

    /// Any other failure to bind the listening socket
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while tearing the server down
    #[error("Shutdown error: {0}")]
    Shutdown(String),
}

impl Error {
    /// Classify a bind failure, keeping "address in use" distinct.
    pub fn from_bind(addr: SocketAddr, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            Error::AddrInUse { addr }
        } else {
            Error::Bind { addr, source }
        }
    }

    /// Whether this error is the "address already in use" startup failure
    pub fn is_addr_in_use(&self) -> bool {
        matches!(self, Error::AddrInUse { .. })
    }
}
