//! Shared utilities for integration tests: generated certificate hierarchies
//! written to temporary PEM files.

#![allow(dead_code)]

use std::path::PathBuf;

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair,
    KeyUsagePurpose,
};
use tempfile::TempDir;

/// A generated CA certificate that can sign further certificates.
pub struct Authority {
    pub pem: String,
    pub der: Vec<u8>,
    issuer: Issuer<'static, KeyPair>,
}

fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
    ];

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, common_name);
    dn.push(DnType::OrganizationName, "ct-publisher tests");
    params.distinguished_name = dn;
    params
}

/// Self-signed root.
pub fn root(common_name: &str) -> Authority {
    let key = KeyPair::generate().unwrap();
    let params = ca_params(common_name);
    let cert = params.self_signed(&key).unwrap();

    Authority {
        pem: cert.pem(),
        der: cert.der().to_vec(),
        issuer: Issuer::new(params, key),
    }
}

/// Intermediate signed by `parent`. Same name under different parents yields
/// the same issuer identity.
pub fn intermediate(common_name: &str, parent: &Authority) -> Authority {
    let key = KeyPair::generate().unwrap();
    let params = ca_params(common_name);
    let cert = params.signed_by(&key, &parent.issuer).unwrap();

    Authority {
        pem: cert.pem(),
        der: cert.der().to_vec(),
        issuer: Issuer::new(params, key),
    }
}

/// End-entity certificate for `host`, DER encoded.
pub fn leaf(host: &str, parent: &Authority) -> Vec<u8> {
    let key = KeyPair::generate().unwrap();
    let params = CertificateParams::new(vec![host.to_string()]).unwrap();
    params.signed_by(&key, &parent.issuer).unwrap().der().to_vec()
}

/// Temporary directory holding PEM files.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write the given PEM blocks, concatenated, to `name`.
    pub fn write(&self, name: &str, pems: &[&str]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, pems.concat()).unwrap();
        path
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// HTTP client that never reuses connections, so graceful stops are not
/// held up by idle keep-alives.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
