//! Hubserve Server
//!
//! Owns the listening socket: address-reuse binding, the accept loop, and
//! signal-driven graceful shutdown.

mod listener;
pub mod server;
pub mod shutdown;

pub use listener::bind_reusable;
pub use server::Server;
pub use shutdown::ShutdownSignal;
