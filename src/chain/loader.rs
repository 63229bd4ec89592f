//! Certificate file loading.
//!
//! # Responsibilities
//! - Read PEM files and extract DER certificates
//! - Parse every certificate as X.509
//! - Check that each certificate in a chain is issued by the next one
//! - Derive the issuer identity of a chain's first certificate

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

use crate::chain::{Bundle, IssuerNameId, LoadError};

/// The certificate under which submissions using a chain are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerCertificate {
    pub id: IssuerNameId,
    /// Subject DN in RFC 4514 form, for logs.
    pub subject: String,
    pub der: Vec<u8>,
}

/// A parsed chain definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedChain {
    pub issuer: IssuerCertificate,
    /// Everything after the issuer, in file order.
    pub bundle: Bundle,
}

/// Load a chain from an ordered list of single-certificate PEM files.
///
/// The first file holds the issuing intermediate. Each certificate must name
/// the next one as its issuer and carry a signature that verifies under the
/// next one's key. The final certificate is not required to be self-signed.
pub fn load_chain(paths: &[PathBuf]) -> Result<LoadedChain, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::EmptyChain);
    }

    let mut ders = paths
        .iter()
        .map(|path| read_single_certificate(path))
        .collect::<Result<Vec<_>, _>>()?;

    let (id, subject) = {
        let parsed = paths
            .iter()
            .zip(&ders)
            .map(|(path, der)| parse_certificate(path, der))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, pair) in parsed.windows(2).enumerate() {
            verify_link(&paths[i], &pair[0], &paths[i + 1], &pair[1])?;
        }

        let issuer = &parsed[0];
        (
            IssuerNameId::from_raw_subject(issuer.subject().as_raw()),
            issuer.subject().to_string(),
        )
    };

    let issuer_der = ders.remove(0);
    tracing::debug!(
        issuer_id = %id,
        subject = %subject,
        bundle_len = ders.len(),
        "Loaded certificate chain"
    );

    Ok(LoadedChain {
        issuer: IssuerCertificate {
            id,
            subject,
            der: issuer_der,
        },
        bundle: Bundle::new(ders),
    })
}

/// Load every certificate of one PEM bundle file, in file order.
pub fn load_cert_bundle(path: &Path) -> Result<Bundle, LoadError> {
    let ders = read_pem_certificates(path)?;
    if ders.is_empty() {
        return Err(LoadError::EmptyBundle {
            path: path.to_path_buf(),
        });
    }
    for der in &ders {
        parse_certificate(path, der)?;
    }

    tracing::debug!(path = %path.display(), certificates = ders.len(), "Loaded certificate bundle");
    Ok(Bundle::new(ders))
}

fn read_pem_certificates(path: &Path) -> Result<Vec<Vec<u8>>, LoadError> {
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);
    rustls_pemfile::certs(&mut reader)
        .map(|cert| cert.map(|der| der.as_ref().to_vec()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)
}

fn read_single_certificate(path: &Path) -> Result<Vec<u8>, LoadError> {
    let mut ders = read_pem_certificates(path)?;
    if ders.len() != 1 {
        return Err(LoadError::CertificateCount {
            path: path.to_path_buf(),
            found: ders.len(),
        });
    }
    Ok(ders.remove(0))
}

fn parse_certificate<'a>(path: &Path, der: &'a [u8]) -> Result<X509Certificate<'a>, LoadError> {
    let (rest, cert) = X509Certificate::from_der(der).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !rest.is_empty() {
        return Err(LoadError::Parse {
            path: path.to_path_buf(),
            reason: format!("{} trailing bytes after certificate", rest.len()),
        });
    }
    Ok(cert)
}

fn verify_link(
    path: &Path,
    cert: &X509Certificate<'_>,
    next_path: &Path,
    next: &X509Certificate<'_>,
) -> Result<(), LoadError> {
    if cert.issuer().as_raw() != next.subject().as_raw() {
        return Err(LoadError::Linkage {
            path: path.to_path_buf(),
            next: next_path.to_path_buf(),
            issuer: cert.issuer().to_string(),
            subject: next.subject().to_string(),
        });
    }

    cert.verify_signature(Some(next.public_key()))
        .map_err(|e| LoadError::Signature {
            path: path.to_path_buf(),
            next: next_path.to_path_buf(),
            reason: e.to_string(),
        })
}
