//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the publisher.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::chain::ChainDefinition;

/// User agent presented to CT logs when none is configured.
pub const DEFAULT_USER_AGENT: &str = "certificate-transparency-go/1.0";

/// Root configuration for the publisher service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PublisherConfig {
    /// Service settings: listeners, chains, client identity.
    pub publisher: ServiceConfig,

    /// Settings shared with other services. Only the legacy CT bundle is read.
    pub common: CommonConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Publisher service settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address for the submission and health endpoints.
    pub address: String,

    /// Listen address for the Prometheus exporter. Disabled when unset.
    pub debug_address: Option<String>,

    /// Optional TLS for the main listener.
    pub tls: Option<TlsConfig>,

    /// User agent sent with CT submissions.
    pub user_agent: Option<String>,

    /// Contention profiling sample rate. Diagnostic only; 0 disables.
    pub block_profile_rate: u64,

    /// Chains we are willing to serve. Each inner list starts with the issuing
    /// intermediate and ends with a root. The first chain for a given issuer
    /// is the default for that issuer.
    pub chains: Vec<ChainDefinition>,

    /// Graceful shutdown tuning.
    pub shutdown: ShutdownConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:9091".to_string(),
            debug_address: None,
            tls: None,
            user_agent: None,
            block_profile_rate: 0,
            chains: Vec::new(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// The configured user agent, or [`DEFAULT_USER_AGENT`] when unset or empty.
    pub fn user_agent(&self) -> &str {
        match self.user_agent.as_deref() {
            Some(ua) if !ua.is_empty() => ua,
            _ => DEFAULT_USER_AGENT,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Graceful shutdown settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Pause between marking health not-serving and stopping the listener.
    pub drain_delay_ms: u64,

    /// Upper bound on waiting for in-flight requests. Unbounded when unset.
    pub grace_period_secs: Option<u64>,
}

/// Settings shared across services.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CommonConfig {
    pub ct: CtConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CtConfig {
    /// Legacy single submission bundle. Only used when `publisher.chains` is empty.
    pub intermediate_bundle_filename: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
        }
    }
}
