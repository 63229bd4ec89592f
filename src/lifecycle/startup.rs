//! Startup orchestration.
//!
//! # Responsibilities
//! - Decide and load the chain source
//! - Initialize metrics and TLS
//! - Bind the listener and register handlers
//! - Install signal handlers and serve until stopped
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration problems are reported before any socket is opened
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;

use crate::config::{chain_source, ConfigError, PublisherConfig};
use crate::error::Error;
use crate::health::HealthReporter;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{ServiceState, Shutdown};
use crate::lifecycle::signals::SignalWatcher;
use crate::net::tls::load_tls_config;
use crate::net::{Listener, ListenerError};
use crate::observability::metrics;
use crate::publisher::Publisher;

/// Failures that prevent the service from reaching Serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("loading TLS material: {0}")]
    Tls(#[source] std::io::Error),

    #[error("starting metrics exporter on {address}: {reason}")]
    Metrics { address: String, reason: String },

    #[error("installing signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

/// A fully initialized publisher whose listener is bound but not serving.
pub struct Service {
    server: HttpServer,
    listener: Listener,
}

impl Service {
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    pub fn state(&self) -> watch::Receiver<ServiceState> {
        self.server.state()
    }

    /// Serve until `shutdown` fires and the drain completes.
    pub async fn serve(self, shutdown: Shutdown) -> Result<(), Error> {
        self.server.run(self.listener, shutdown).await?;
        Ok(())
    }
}

/// Build everything needed to serve, in dependency order.
pub async fn prepare(config: &PublisherConfig) -> Result<Service, Error> {
    let service = &config.publisher;

    let source = chain_source(config).map_err(|e| ConfigError::Validation(vec![e]))?;
    let bundles = source.load()?;

    if let Some(debug_address) = &service.debug_address {
        let addr: SocketAddr = debug_address.parse().map_err(|e: std::net::AddrParseError| {
            StartupError::Metrics {
                address: debug_address.clone(),
                reason: e.to_string(),
            }
        })?;
        metrics::init_metrics(addr).map_err(|e| StartupError::Metrics {
            address: debug_address.clone(),
            reason: e.to_string(),
        })?;
    }
    metrics::record_issuers(bundles.issuer_count());
    metrics::record_block_profile_rate(service.block_profile_rate);
    if service.block_profile_rate > 0 {
        tracing::info!(rate = service.block_profile_rate, "Contention profiling sample rate set");
    }

    let tls = match &service.tls {
        Some(tls) => Some(load_tls_config(tls).await.map_err(StartupError::Tls)?),
        None => None,
    };

    let publisher = Arc::new(Publisher::new(bundles, service.user_agent()));
    tracing::info!(user_agent = publisher.user_agent(), "Publisher initialized");

    let health = HealthReporter::new();
    let listener = Listener::bind(&service.address).map_err(StartupError::from)?;

    let mut server =
        HttpServer::new(publisher, health).with_shutdown_config(service.shutdown);
    if let Some(tls) = tls {
        server = server.with_tls(tls);
    }

    Ok(Service { server, listener })
}

/// Run the publisher until a termination signal completes the drain.
pub async fn run(config: PublisherConfig) -> Result<(), Error> {
    let service = prepare(&config).await?;

    let shutdown = Shutdown::new();
    SignalWatcher::install()
        .map_err(StartupError::Signals)?
        .spawn(shutdown.clone());

    service.serve(shutdown).await
}
