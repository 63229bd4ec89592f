//! Submission facade.
//!
//! Chooses the certificates that accompany a leaf when it is submitted to a
//! CT log and renders them as an RFC 6962 `add-chain` request body. Sending
//! the request to logs is handled elsewhere.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::{Bundle, BundleSource, IssuerNameId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublisherError {
    #[error("no chain configured for issuer {0}")]
    UnknownIssuer(IssuerNameId),

    #[error("issuer {issuer} has no chain at index {index}")]
    UnknownChain { issuer: IssuerNameId, index: usize },
}

/// Body of an RFC 6962 `add-chain` / `add-pre-chain` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddChainRequest {
    /// Base64 DER certificates, leaf first.
    pub chain: Vec<String>,
}

/// Holds the resolved bundles and the identity presented to CT logs.
#[derive(Debug)]
pub struct Publisher {
    source: BundleSource,
    user_agent: String,
}

impl Publisher {
    pub fn new(source: BundleSource, user_agent: impl Into<String>) -> Self {
        Self {
            source,
            user_agent: user_agent.into(),
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn source(&self) -> &BundleSource {
        &self.source
    }

    /// The bundle for a submission under `issuer`.
    ///
    /// `selection` picks an explicitly requested chain; `None` and `Some(0)`
    /// mean the issuer's default. The legacy bundle only has a default.
    pub fn chain_for(
        &self,
        issuer: IssuerNameId,
        selection: Option<usize>,
    ) -> Result<&Bundle, PublisherError> {
        let index = selection.unwrap_or(0);
        match &self.source {
            BundleSource::Legacy(bundle) if index == 0 => Ok(bundle),
            BundleSource::Legacy(_) => Err(PublisherError::UnknownChain { issuer, index }),
            BundleSource::PerIssuer(mapping) => {
                if mapping.chain_count(issuer) == 0 {
                    return Err(PublisherError::UnknownIssuer(issuer));
                }
                mapping
                    .bundle(issuer, index)
                    .ok_or(PublisherError::UnknownChain { issuer, index })
            }
        }
    }

    /// Build the `add-chain` body for `leaf` issued by `issuer`.
    pub fn add_chain_request(
        &self,
        leaf: &[u8],
        issuer: IssuerNameId,
        selection: Option<usize>,
    ) -> Result<AddChainRequest, PublisherError> {
        let bundle = self.chain_for(issuer, selection)?;

        let mut chain = Vec::with_capacity(bundle.len() + 2);
        chain.push(STANDARD.encode(leaf));
        if let BundleSource::PerIssuer(mapping) = &self.source {
            let index = selection.unwrap_or(0);
            if let Some(issuer_der) = mapping.issuer_certificate(issuer, index) {
                chain.push(STANDARD.encode(issuer_der));
            }
        }
        chain.extend(bundle.iter().map(|der| STANDARD.encode(der)));

        Ok(AddChainRequest { chain })
    }
}
