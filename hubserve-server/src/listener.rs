//! Listening socket setup

use hubserve_core::{Error, Result};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpSocket};

const BACKLOG: u32 = 1024;

/// Bind `addr` with `SO_REUSEADDR` (and `SO_REUSEPORT` where available) so a
/// restarted server does not trip over sockets left in TIME_WAIT.
pub fn bind_reusable(addr: SocketAddr) -> Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|e| Error::from_bind(addr, e))?;

    socket
        .set_reuseaddr(true)
        .map_err(|e| Error::from_bind(addr, e))?;

    #[cfg(all(unix, not(any(target_os = "solaris", target_os = "illumos", target_os = "cygwin"))))]
    if let Err(e) = socket.set_reuseport(true) {
        tracing::debug!("SO_REUSEPORT unavailable: {}", e);
    }

    socket.bind(addr).map_err(|e| Error::from_bind(addr, e))?;
    socket.listen(BACKLOG).map_err(|e| Error::from_bind(addr, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = bind_reusable("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_addr_in_use_is_distinct() {
        // A plain listener without SO_REUSEPORT blocks our bind
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap();

        let err = bind_reusable(addr).unwrap_err();
        assert!(err.is_addr_in_use(), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_rebind_after_drop() {
        let listener = bind_reusable("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(bind_reusable(addr).is_ok());
    }
}
