//! Top-level error type.

use thiserror::Error;

use crate::chain::LoadError;
use crate::config::ConfigError;
use crate::lifecycle::{ShutdownError, StartupError};

/// Every fatal failure the publisher can report to the operator.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("loading certificates: {0}")]
    Load(#[from] LoadError),

    #[error("startup: {0}")]
    Startup(#[from] StartupError),

    #[error("shutdown: {0}")]
    Shutdown(#[from] ShutdownError),
}
