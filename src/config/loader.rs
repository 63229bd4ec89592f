//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::PublisherConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Command-line values that replace their config file counterparts.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub address: Option<String>,
    pub debug_address: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut PublisherConfig) {
        if let Some(address) = &self.address {
            config.publisher.address = address.clone();
        }
        if let Some(debug) = &self.debug_address {
            config.publisher.debug_address = Some(debug.clone());
        }
    }
}

/// Parse a config file without validating it.
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
pub fn read_config(path: &Path) -> Result<PublisherConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

/// Load a config file, apply command-line overrides, and validate the result.
pub fn load_config(path: &Path, overrides: &Overrides) -> Result<PublisherConfig, ConfigError> {
    let mut config = read_config(path)?;
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
