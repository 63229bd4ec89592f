//! Certificate chain subsystem.
//!
//! # Data Flow
//! ```text
//! Chain definitions (ordered file lists from config)
//!     → loader.rs (read PEM, parse X.509, check issuer linkage)
//!     → identity.rs (IssuerNameId of the issuing certificate)
//!     → resolver.rs (first chain per issuer becomes the default)
//!     → BundleSource (immutable, shared via Arc)
//!
//! Legacy configuration (single bundle file):
//!     → loader.rs (flat parse of every certificate)
//!     → BundleSource::Legacy
//! ```
//!
//! # Design Decisions
//! - Resolution is all-or-nothing: a single bad file aborts startup
//! - The chain source is decided once; downstream code never branches on config
//! - Bundles are never mutated after startup, so no locking

pub mod identity;
pub mod loader;
pub mod resolver;

use std::ops::Deref;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use identity::IssuerNameId;
pub use loader::{load_cert_bundle, load_chain, IssuerCertificate, LoadedChain};
pub use resolver::{resolve, BundleMapping, BundleSource, ChainSource};

/// An ordered list of certificate files: the issuing intermediate first,
/// then any further intermediates, then the root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ChainDefinition(Vec<PathBuf>);

impl ChainDefinition {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    /// The issuing certificate's file, if the definition is non-empty.
    pub fn issuer_path(&self) -> Option<&Path> {
        self.0.first().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// DER certificates attached to a CT submission after the leaf's issuer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    certificates: Vec<Vec<u8>>,
}

impl Bundle {
    pub fn new(certificates: Vec<Vec<u8>>) -> Self {
        Self { certificates }
    }

    pub fn into_vec(self) -> Vec<Vec<u8>> {
        self.certificates
    }
}

impl Deref for Bundle {
    type Target = [Vec<u8>];

    fn deref(&self) -> &Self::Target {
        &self.certificates
    }
}

impl From<Vec<Vec<u8>>> for Bundle {
    fn from(certificates: Vec<Vec<u8>>) -> Self {
        Self::new(certificates)
    }
}

/// Errors raised while loading certificate material.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: expected exactly one PEM certificate, found {found}", .path.display())]
    CertificateCount { path: PathBuf, found: usize },

    #[error("{}: no PEM certificates found", .path.display())]
    EmptyBundle { path: PathBuf },

    #[error("{}: invalid X.509 certificate: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error(
        "{}: issuer {issuer:?} does not match subject {subject:?} of {}",
        .path.display(),
        .next.display()
    )]
    Linkage {
        path: PathBuf,
        next: PathBuf,
        issuer: String,
        subject: String,
    },

    #[error("{}: signature does not verify under the key of {}: {reason}", .path.display(), .next.display())]
    Signature {
        path: PathBuf,
        next: PathBuf,
        reason: String,
    },

    #[error("chain definition has no files")]
    EmptyChain,

    /// Failure while loading one configured chain.
    #[error("chain {index}: {source}")]
    Chain {
        index: usize,
        #[source]
        source: Box<LoadError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_definition_from_toml_list() {
        #[derive(Deserialize)]
        struct Holder {
            chains: Vec<ChainDefinition>,
        }

        let holder: Holder =
            toml::from_str(r#"chains = [["int.pem", "root.pem"], ["other.pem"]]"#).unwrap();
        assert_eq!(holder.chains.len(), 2);
        assert_eq!(holder.chains[0].issuer_path(), Some(Path::new("int.pem")));
        assert_eq!(holder.chains[1].paths().len(), 1);
    }

    #[test]
    fn nested_load_error_names_chain_and_file() {
        let err = LoadError::Chain {
            index: 3,
            source: Box::new(LoadError::EmptyBundle {
                path: PathBuf::from("/etc/ct/int.pem"),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("chain 3"));
        assert!(message.contains("/etc/ct/int.pem"));
    }
}
