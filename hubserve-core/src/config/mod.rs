//! Configuration for Hubserve

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CompressionLevel, HubserveConfig, LoggingConfig};
