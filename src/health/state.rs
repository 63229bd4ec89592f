//! Serving status shared by the health endpoint and the lifecycle.
//!
//! # States
//! - NotServing: process is starting or draining; load balancers should
//!   route elsewhere
//! - Serving: submissions are accepted
//!
//! # State Transitions
//! ```text
//! NotServing → Serving: listener bound, handlers registered
//! Serving → NotServing: shutdown requested (terminal)
//! ```
//!
//! # Design Decisions
//! - Once shut down the reporter never reports Serving again
//! - Changes are published on a watch channel so waiters never poll

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServingStatus {
    Serving,
    NotServing,
}

#[derive(Debug)]
struct Inner {
    status: watch::Sender<ServingStatus>,
    shut_down: AtomicBool,
}

/// Cloneable handle to the process health status.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    inner: Arc<Inner>,
}

impl HealthReporter {
    /// Create a reporter in the NotServing state.
    pub fn new() -> Self {
        let (status, _) = watch::channel(ServingStatus::NotServing);
        Self {
            inner: Arc::new(Inner {
                status,
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Report Serving, unless [`shutdown`](Self::shutdown) was already called.
    pub fn set_serving(&self) {
        if self.inner.shut_down.load(Ordering::SeqCst) {
            tracing::debug!("Ignoring serving transition after health shutdown");
            return;
        }
        self.publish(ServingStatus::Serving);
    }

    /// Report NotServing permanently.
    pub fn shutdown(&self) {
        self.inner.shut_down.store(true, Ordering::SeqCst);
        self.publish(ServingStatus::NotServing);
    }

    pub fn status(&self) -> ServingStatus {
        *self.inner.status.borrow()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<ServingStatus> {
        self.inner.status.subscribe()
    }

    fn publish(&self, status: ServingStatus) {
        let previous = self.inner.status.send_replace(status);
        if previous != status {
            tracing::info!(?previous, current = ?status, "Health status changed");
        }
        metrics::record_health(status == ServingStatus::Serving);
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}
