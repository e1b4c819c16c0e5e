//! Hubserve Static File Serving
//!
//! Everything between a parsed request and a finished response:
//! - Path resolution with index files and trailing-slash redirects
//! - Extension-based caching and compression policy
//! - On-the-fly gzip
//! - Directory listings
//! - Header augmentation (Cache-Control, CORS, keep-alive)

mod compress;
mod handler;
mod listing;
mod mime;
mod plan;
mod policy;
mod resolver;

pub use compress::Compressor;
pub use handler::RequestHandler;
pub use listing::{DirectoryLister, HtmlDirectoryLister};
pub use mime::guess_mime_type;
pub use plan::ResponsePlan;
pub use policy::{CACHE_LONG, CACHE_SHORT, PolicyDecision, ResponsePolicy};
pub use resolver::{PathResolver, Resolution, ResolvedTarget};
