//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate listen addresses
//! - Decide the chain source: per-issuer chains or the legacy bundle
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the parsed config; it touches neither
//!   the filesystem nor the network

use std::net::SocketAddr;

use thiserror::Error;

use crate::chain::ChainSource;
use crate::config::schema::PublisherConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} {value:?} is not a valid socket address: {reason}")]
    InvalidAddress {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("publisher.chains[{index}] is empty")]
    EmptyChain { index: usize },

    #[error("no CT submission chains or legacy bundle provided")]
    NoChainSource,

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },

    #[error("publisher.user_agent {0:?} contains characters not allowed in an HTTP header")]
    InvalidUserAgent(String),
}

/// Check the whole configuration, collecting every problem found.
pub fn validate_config(config: &PublisherConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let service = &config.publisher;

    check_address("publisher.address", &service.address, &mut errors);
    if let Some(debug) = &service.debug_address {
        check_address("publisher.debug_address", debug, &mut errors);
    }

    if let Some(tls) = &service.tls {
        if tls.cert_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath {
                field: "publisher.tls.cert_path",
            });
        }
        if tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyPath {
                field: "publisher.tls.key_path",
            });
        }
    }

    if let Some(ua) = &service.user_agent {
        if !ua.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
            errors.push(ValidationError::InvalidUserAgent(ua.clone()));
        }
    }

    for (index, chain) in service.chains.iter().enumerate() {
        if chain.is_empty() {
            errors.push(ValidationError::EmptyChain { index });
        }
    }

    if let Err(e) = chain_source(config) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Decide where submission bundles come from.
///
/// Configured chains always take precedence over the legacy bundle filename.
pub fn chain_source(config: &PublisherConfig) -> Result<ChainSource, ValidationError> {
    if !config.publisher.chains.is_empty() {
        return Ok(ChainSource::Chains(config.publisher.chains.clone()));
    }

    match &config.common.ct.intermediate_bundle_filename {
        Some(path) if !path.as_os_str().is_empty() => Ok(ChainSource::Legacy(path.clone())),
        _ => Err(ValidationError::NoChainSource),
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = value.parse::<SocketAddr>() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        });
    }
}
