//! Shutdown signalling
//!
//! OS signals never run teardown code themselves. They flip a
//! [`ShutdownSignal`], and the accept loop selects on it.

use tokio::sync::watch;

/// Clonable, idempotent shutdown trigger
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: watch::Sender<bool>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Create an untriggered signal
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Create a signal that fires on SIGINT or SIGTERM (Ctrl+C elsewhere).
    /// Must be called from within a tokio runtime.
    pub fn with_os_signals() -> std::io::Result<Self> {
        let shutdown = Self::new();
        let trigger = shutdown.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            tokio::spawn(async move {
                tokio::select! {
                    _ = sigint.recv() => tracing::info!("🔔 Received SIGINT, shutting down"),
                    _ = sigterm.recv() => tracing::info!("🔔 Received SIGTERM, shutting down"),
                }
                trigger.trigger();
            });
        }

        #[cfg(not(unix))]
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("🔔 Received Ctrl+C, shutting down"),
                Err(e) => tracing::error!("❌ Failed to listen for Ctrl+C: {}", e),
            }
            trigger.trigger();
        });

        Ok(shutdown)
    }

    /// Fire the signal. Calling this more than once is harmless.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Whether the signal has fired
    pub fn is_triggered(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until the signal fires. Returns immediately if it already has.
    pub async fn recv(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}
