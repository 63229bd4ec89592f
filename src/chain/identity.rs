//! Issuer identity derivation.
//!
//! An issuer is identified by its subject name, not by the certificate that
//! carries it: cross-signed or reissued intermediates that share a subject DN
//! map to the same [`IssuerNameId`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Stable identifier of an issuing key, derived from the raw DER subject.
///
/// The value is the first 7 bytes of SHA-256 over the subject, read as a
/// big-endian integer, so it always fits in a non-negative `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerNameId(i64);

impl IssuerNameId {
    /// Derive the identifier from a certificate's raw DER-encoded subject.
    pub fn from_raw_subject(raw_subject: &[u8]) -> Self {
        let digest = Sha256::digest(raw_subject);
        let mut bytes = [0u8; 8];
        bytes[1..].copy_from_slice(&digest[..7]);
        Self(i64::from_be_bytes(bytes))
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for IssuerNameId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for IssuerNameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
