//! Shutdown coordination for the publisher.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::ShutdownConfig;
use crate::health::HealthReporter;

/// Lifecycle of the serving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Listener bound, not yet serving.
    Created,
    /// Accepting and handling requests.
    Serving,
    /// Health is not-serving; in-flight requests are finishing.
    Draining,
    /// Listener released. Terminal.
    Stopped,
}

/// Failure of the serve loop that was not caused by a requested stop.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("serving failed: {0}")]
    Serve(#[source] io::Error),

    #[error("drain task failed: {0}")]
    Drain(String),
}

/// Coordinator for graceful shutdown.
///
/// A single cancellation event, published on a watch channel so that
/// subscribers created after the trigger still observe it.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the shutdown signal. Returns true only for the first call.
    pub fn trigger(&self) -> bool {
        let first = !self.tx.send_replace(true);
        if first {
            tracing::info!("Shutdown triggered");
        }
        first
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the shutdown signal has been triggered.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain sequence run when `shutdown` fires.
///
/// Health goes not-serving first, then the listener stops accepting and waits
/// for in-flight requests, bounded by `grace_period_secs` when set.
pub(crate) async fn drain_on_shutdown(
    shutdown: Shutdown,
    health: HealthReporter,
    state: Arc<watch::Sender<ServiceState>>,
    handle: Handle,
    config: ShutdownConfig,
) {
    shutdown.wait().await;

    health.shutdown();
    state.send_replace(ServiceState::Draining);
    tracing::info!(
        connections = handle.connection_count(),
        drain_delay_ms = config.drain_delay_ms,
        "Draining: health reports not serving"
    );

    if config.drain_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.drain_delay_ms)).await;
    }
    handle.graceful_shutdown(config.grace_period_secs.map(Duration::from_secs));
}

/// Drop errors that only surface because a stop was requested.
///
/// Connection teardown errors are expected while the listener drains; any
/// other error, or any error while no stop was requested, is reported.
pub fn filter_shutdown_errors(result: io::Result<()>, stopping: bool) -> Result<(), ShutdownError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if stopping && is_shutdown_induced(&e) => {
            tracing::debug!(error = %e, "Ignoring error caused by shutdown");
            Ok(())
        }
        Err(e) => Err(ShutdownError::Serve(e)),
    }
}

fn is_shutdown_induced(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::NotConnected
    )
}
