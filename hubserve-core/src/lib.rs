//! Hubserve Core Library
//!
//! This crate provides the shared pieces of the Hubserve static file server:
//! the immutable runtime configuration, its loader, and the error taxonomy.

pub mod config;
pub mod error;

pub use error::{Error, Result};

/// Hubserve version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
