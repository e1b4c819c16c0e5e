//! Static file server lifecycle

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use hubserve_core::config::HubserveConfig;
use hubserve_core::{Error, Result};
use hubserve_static::RequestHandler;

use crate::listener::bind_reusable;
use crate::shutdown::ShutdownSignal;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// A bound static file server, ready to run
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    handler: Arc<RequestHandler>,
    shutdown_grace: Duration,
}

impl Server {
    /// Validate the serving root, then bind the listening socket.
    ///
    /// The root is checked first so a missing directory never binds a port.
    pub fn bind(config: &HubserveConfig) -> Result<Self> {
        let handler = RequestHandler::from_config(config)?;
        let addr = config.socket_addr()?;
        let listener = bind_reusable(addr)?;
        let local_addr = listener.local_addr()?;

        tracing::info!(
            "🌐 Listening on http://{} serving {}",
            local_addr,
            handler.root().display()
        );

        Ok(Self {
            listener,
            local_addr,
            handler: Arc::new(handler),
            shutdown_grace: config.shutdown_grace(),
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The canonical serving root
    pub fn root(&self) -> &Path {
        self.handler.root()
    }

    /// Accept connections until `shutdown` fires, then close the listener and
    /// give in-flight connections the configured grace period to finish.
    ///
    /// Returns [`Error::Shutdown`] if connections were still open when the
    /// grace period ran out; the listener is closed either way.
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<()> {
        let Server {
            listener,
            local_addr,
            handler,
            shutdown_grace,
        } = self;
        let graceful = GracefulShutdown::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(s) => s,
                        Err(e) => {
                            // e.g. EMFILE; back off instead of spinning
                            tracing::warn!("Accept error: {}", e);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };

                    let io = TokioIo::new(stream);
                    let handler = handler.clone();
                    let service = service_fn(move |req| {
                        let handler = handler.clone();
                        async move { Ok::<_, Infallible>(serve_request(&handler, peer, req).await) }
                    });

                    let conn = http1::Builder::new()
                        .keep_alive(true)
                        .serve_connection(io, service);
                    let conn = graceful.watch(conn);

                    tokio::spawn(async move {
                        // Errors here happen after headers went out; all we can do is log
                        if let Err(err) = conn.await {
                            tracing::error!("Error serving connection from {}: {}", peer, err);
                        }
                    });
                }

                _ = shutdown.recv() => {
                    tracing::info!("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        drop(listener);
        tracing::info!("🔌 Closed listening socket {}", local_addr);

        tokio::select! {
            _ = graceful.shutdown() => {
                tracing::info!("✅ All connections closed");
                Ok(())
            }
            _ = tokio::time::sleep(shutdown_grace) => {
                Err(Error::Shutdown(format!(
                    "connections still open after {:?} grace period, abandoning them",
                    shutdown_grace
                )))
            }
        }
    }
}

async fn serve_request(
    handler: &RequestHandler,
    peer: SocketAddr,
    req: Request<Incoming>,
) -> Response<Full<Bytes>> {
    // GET/HEAD bodies carry nothing we use
    let req = req.map(|_| ());
    let response = handler.handle(&req).await;
    tracing::info!(
        target: "hubserve::access",
        "{} - \"{} {} {:?}\" {}",
        peer.ip(),
        req.method(),
        req.uri(),
        req.version(),
        response.status().as_u16()
    );
    response
}
