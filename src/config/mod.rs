//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML or JSON)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (listen addresses)
//!     → validation.rs (semantic checks, chain source decision)
//!     → PublisherConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{
    CommonConfig, CtConfig, ObservabilityConfig, PublisherConfig, ServiceConfig, ShutdownConfig,
    TlsConfig, DEFAULT_USER_AGENT,
};
pub use validation::{chain_source, ValidationError};
