//! Chain bundle resolution.
//!
//! Turns the configured chain source into the bundles attached to CT
//! submissions. With per-issuer chains the first chain seen for an issuer is
//! its default; later chains for the same issuer are kept as alternates and
//! never replace the default.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::chain::loader::{load_cert_bundle, load_chain, LoadedChain};
use crate::chain::{Bundle, ChainDefinition, IssuerNameId, LoadError};

/// Where submission bundles come from, decided once at config validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainSource {
    /// Per-issuer chains, in configuration order.
    Chains(Vec<ChainDefinition>),
    /// A single PEM bundle used for every issuer.
    Legacy(PathBuf),
}

impl ChainSource {
    /// Load the certificate material this source points at.
    pub fn load(&self) -> Result<BundleSource, LoadError> {
        match self {
            ChainSource::Chains(chains) => {
                let mapping = resolve(chains)?;
                tracing::info!(
                    chains = chains.len(),
                    issuers = mapping.len(),
                    "Resolved per-issuer submission chains"
                );
                Ok(BundleSource::PerIssuer(mapping))
            }
            ChainSource::Legacy(path) => {
                let bundle = load_cert_bundle(path)?;
                tracing::warn!(
                    path = %path.display(),
                    certificates = bundle.len(),
                    "Using legacy submission bundle for all issuers; configure per-issuer chains instead"
                );
                Ok(BundleSource::Legacy(bundle))
            }
        }
    }
}

/// Resolved submission bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleSource {
    PerIssuer(BundleMapping),
    Legacy(Bundle),
}

impl BundleSource {
    /// Number of distinct issuers with a configured chain (0 for legacy).
    pub fn issuer_count(&self) -> usize {
        match self {
            BundleSource::PerIssuer(mapping) => mapping.len(),
            BundleSource::Legacy(_) => 0,
        }
    }
}

/// One configured chain: the issuing certificate it starts from and the rest.
///
/// Chains for the same issuer identity can start from different
/// certificates (cross-signed intermediates), so each keeps its own.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedChain {
    issuer_der: Vec<u8>,
    bundle: Bundle,
}

/// All chains configured for one issuer. Index 0 is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
struct IssuerChains {
    subject: String,
    chains: Vec<ResolvedChain>,
}

impl IssuerChains {
    fn get(&self, index: usize) -> Option<&ResolvedChain> {
        self.chains.get(index)
    }
}

/// Where [`BundleMapping::insert`] placed a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Default,
    Alternate(usize),
}

/// Issuer identity → default submission bundle, plus alternates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleMapping {
    issuers: HashMap<IssuerNameId, IssuerChains>,
}

impl BundleMapping {
    /// Add a loaded chain. The first chain for an issuer becomes its default.
    pub fn insert(&mut self, chain: LoadedChain) -> Placement {
        let LoadedChain { issuer, bundle } = chain;
        let resolved = ResolvedChain {
            issuer_der: issuer.der,
            bundle,
        };
        match self.issuers.get_mut(&issuer.id) {
            Some(existing) => {
                existing.chains.push(resolved);
                Placement::Alternate(existing.chains.len() - 1)
            }
            None => {
                self.issuers.insert(
                    issuer.id,
                    IssuerChains {
                        subject: issuer.subject,
                        chains: vec![resolved],
                    },
                );
                Placement::Default
            }
        }
    }

    pub fn default_bundle(&self, issuer: IssuerNameId) -> Option<&Bundle> {
        self.bundle(issuer, 0)
    }

    /// A specific chain for an issuer; 0 is the default.
    pub fn bundle(&self, issuer: IssuerNameId, index: usize) -> Option<&Bundle> {
        self.issuers.get(&issuer)?.get(index).map(|c| &c.bundle)
    }

    /// DER of the issuing certificate that starts chain `index` for an issuer.
    pub fn issuer_certificate(&self, issuer: IssuerNameId, index: usize) -> Option<&[u8]> {
        self.issuers
            .get(&issuer)?
            .get(index)
            .map(|c| c.issuer_der.as_slice())
    }

    pub fn issuer_subject(&self, issuer: IssuerNameId) -> Option<&str> {
        self.issuers.get(&issuer).map(|c| c.subject.as_str())
    }

    /// Number of chains configured for an issuer, default included.
    pub fn chain_count(&self, issuer: IssuerNameId) -> usize {
        self.issuers.get(&issuer).map_or(0, |c| c.chains.len())
    }

    pub fn issuers(&self) -> impl Iterator<Item = IssuerNameId> + '_ {
        self.issuers.keys().copied()
    }

    /// Number of distinct issuers.
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

/// Load every chain definition, in order, into a [`BundleMapping`].
///
/// Any failure aborts resolution; no partial mapping is returned.
pub fn resolve(chains: &[ChainDefinition]) -> Result<BundleMapping, LoadError> {
    let mut mapping = BundleMapping::default();

    for (index, definition) in chains.iter().enumerate() {
        let loaded = load_chain(definition.paths()).map_err(|source| LoadError::Chain {
            index,
            source: Box::new(source),
        })?;
        let issuer_id = loaded.issuer.id;
        let subject = loaded.issuer.subject.clone();

        match mapping.insert(loaded) {
            Placement::Default => tracing::info!(
                chain = index,
                issuer_id = %issuer_id,
                subject = %subject,
                "Default chain for issuer"
            ),
            Placement::Alternate(alternate) => tracing::info!(
                chain = index,
                issuer_id = %issuer_id,
                subject = %subject,
                alternate,
                "Additional chain for issuer; default unchanged"
            ),
        }
    }

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::IssuerCertificate;

    fn chain(id: i64, bundle: &[&[u8]]) -> LoadedChain {
        LoadedChain {
            issuer: IssuerCertificate {
                id: IssuerNameId::from(id),
                subject: format!("CN=issuer {id}"),
                der: vec![id as u8],
            },
            bundle: Bundle::new(bundle.iter().map(|b| b.to_vec()).collect()),
        }
    }

    #[test]
    fn first_chain_wins() {
        let mut mapping = BundleMapping::default();
        assert_eq!(mapping.insert(chain(1, &[b"root-a"])), Placement::Default);
        assert_eq!(mapping.insert(chain(1, &[b"root-b"])), Placement::Alternate(1));

        let id = IssuerNameId::from(1);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.default_bundle(id).unwrap()[0], b"root-a");
        assert_eq!(mapping.bundle(id, 1).unwrap()[0], b"root-b");
        assert_eq!(mapping.chain_count(id), 2);
    }

    #[test]
    fn one_default_per_distinct_issuer() {
        let mut mapping = BundleMapping::default();
        for (id, root) in [(1, b"r1"), (2, b"r2"), (1, b"r3"), (3, b"r4"), (2, b"r5")] {
            mapping.insert(chain(id, &[root]));
        }
        assert_eq!(mapping.len(), 3);

        let mut issuers: Vec<_> = mapping.issuers().map(|i| i.as_i64()).collect();
        issuers.sort();
        assert_eq!(issuers, vec![1, 2, 3]);
    }

    #[test]
    fn each_chain_keeps_its_issuing_certificate() {
        let mut mapping = BundleMapping::default();
        mapping.insert(chain(7, &[]));
        let mut later = chain(7, &[b"x"]);
        later.issuer.der = vec![0xff];
        mapping.insert(later);

        let id = IssuerNameId::from(7);
        assert_eq!(mapping.issuer_certificate(id, 0), Some(&[7u8][..]));
        assert_eq!(mapping.issuer_certificate(id, 1), Some(&[0xffu8][..]));
        assert_eq!(mapping.issuer_certificate(id, 2), None);
    }

    #[test]
    fn unknown_issuer_has_no_bundle() {
        let mapping = BundleMapping::default();
        assert!(mapping.default_bundle(IssuerNameId::from(9)).is_none());
        assert_eq!(mapping.chain_count(IssuerNameId::from(9)), 0);
    }

    #[test]
    fn empty_definition_list_resolves_to_empty_mapping() {
        assert!(resolve(&[]).unwrap().is_empty());
    }

    #[test]
    fn failing_chain_is_identified_by_index() {
        let chains = vec![ChainDefinition::new(["/nonexistent/int.pem"])];
        let err = resolve(&chains).unwrap_err();
        assert!(matches!(err, LoadError::Chain { index: 0, .. }));
    }
}
