//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse and bind the configured address
//! - Surface bind failures before any handler is registered
//! - Hand the bound socket to the HTTP server

use std::net::SocketAddr;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Address could not be parsed.
    Address { address: String, reason: String },
    /// Failed to bind to address.
    Bind { address: SocketAddr, source: std::io::Error },
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Address { address, reason } => {
                write!(f, "Invalid listen address {:?}: {}", address, reason)
            }
            ListenerError::Bind { address, source } => {
                write!(f, "Failed to bind {}: {}", address, source)
            }
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Address { .. } => None,
            ListenerError::Bind { source, .. } => Some(source),
        }
    }
}

/// A bound, non-blocking TCP listener that has not started serving.
#[derive(Debug)]
pub struct Listener {
    inner: std::net::TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the given address.
    pub fn bind(address: &str) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(|e: std::net::AddrParseError| {
            ListenerError::Address {
                address: address.to_string(),
                reason: e.to_string(),
            }
        })?;

        let bind_error = |source| ListenerError::Bind {
            address: addr,
            source,
        };
        let inner = std::net::TcpListener::bind(addr).map_err(bind_error)?;
        inner.set_nonblocking(true).map_err(bind_error)?;
        let local_addr = inner.local_addr().map_err(bind_error)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn into_std(self) -> std::net::TcpListener {
        self.inner
    }
}
