//! `x509-parser` backed inspector.

use super::chain::{self, Verification};
use super::{key, read_file, strip_leading_zeros, CertInspector, InspectError, Purpose};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;
use x509_parser::pem::Pem;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// Inspector reading PEM files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct X509Inspector;

impl X509Inspector {
    pub fn new() -> Self {
        X509Inspector
    }
}

impl CertInspector for X509Inspector {
    fn not_after(&self, cert: &Path) -> Result<DateTime<Utc>, InspectError> {
        with_first_certificate(cert, |x509| {
            let ts = x509.validity().not_after.timestamp();
            DateTime::from_timestamp(ts, 0).ok_or_else(|| InspectError::Parse {
                path: cert.to_path_buf(),
                message: format!("notAfter timestamp {} out of range", ts),
            })
        })
    }

    fn is_ca(&self, cert: &Path) -> Result<bool, InspectError> {
        with_first_certificate(cert, |x509| match x509.basic_constraints() {
            Ok(Some(bc)) => Ok(bc.value.ca),
            Ok(None) => Ok(false),
            Err(e) => Err(InspectError::Parse {
                path: cert.to_path_buf(),
                message: format!("basic constraints: {}", e),
            }),
        })
    }

    fn subject(&self, cert: &Path) -> Result<String, InspectError> {
        with_first_certificate(cert, |x509| Ok(x509.subject().to_string()))
    }

    fn cert_modulus(&self, cert: &Path) -> Result<Vec<u8>, InspectError> {
        with_first_certificate(cert, |x509| {
            let spki = x509.public_key();
            match spki.parsed() {
                Ok(PublicKey::RSA(rsa)) => Ok(strip_leading_zeros(rsa.modulus).to_vec()),
                Ok(_) => Err(InspectError::UnsupportedKey {
                    path: cert.to_path_buf(),
                    message: format!(
                        "certificate public key is not RSA (algorithm {})",
                        spki.algorithm.algorithm
                    ),
                }),
                Err(e) => Err(InspectError::Parse {
                    path: cert.to_path_buf(),
                    message: format!("public key: {}", e),
                }),
            }
        })
    }

    fn key_modulus(&self, key_path: &Path) -> Result<Vec<u8>, InspectError> {
        let data = read_file(key_path)?;
        let blocks = pem_blocks(key_path, &data)?;
        key::rsa_modulus(key_path, &blocks)
    }

    fn verify_chain(
        &self,
        cert: &Path,
        ca_bundle: &Path,
        purpose: Purpose,
        at: DateTime<Utc>,
    ) -> Result<Verification, InspectError> {
        let presented = read_certificates(cert)?;
        let bundle = read_certificates(ca_bundle)?;

        let presented = parse_all(cert, &presented)?;
        let anchors = parse_all(ca_bundle, &bundle)?;
        debug!(
            presented = presented.len(),
            anchors = anchors.len(),
            %purpose,
            "verifying certificate chain"
        );

        let Some((leaf, intermediates)) = presented.split_first() else {
            return Err(InspectError::Missing {
                path: cert.to_path_buf(),
                label: "certificate",
            });
        };
        Ok(chain::verify(leaf, intermediates, &anchors, purpose, at.timestamp()))
    }
}

/// Decode every PEM block in `data`.
///
/// Trailing garbage after at least one good block is ignored, matching how
/// OpenSSL tolerates comments at the end of bundle files.
pub(crate) fn pem_blocks(path: &Path, data: &[u8]) -> Result<Vec<Pem>, InspectError> {
    let mut blocks = Vec::new();
    for item in Pem::iter_from_buffer(data) {
        match item {
            Ok(pem) => blocks.push(pem),
            Err(e) => {
                if !blocks.is_empty() {
                    break;
                }
                return Err(InspectError::Pem {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(blocks)
}

/// DER bodies of every certificate in a PEM file, in file order.
pub(crate) fn read_certificates(path: &Path) -> Result<Vec<Vec<u8>>, InspectError> {
    let data = read_file(path)?;
    let certs: Vec<Vec<u8>> = pem_blocks(path, &data)?
        .into_iter()
        .filter(|pem| pem.label == "CERTIFICATE" || pem.label == "TRUSTED CERTIFICATE")
        .map(|pem| pem.contents)
        .collect();

    if certs.is_empty() {
        return Err(InspectError::Missing {
            path: path.to_path_buf(),
            label: "certificate",
        });
    }
    Ok(certs)
}

fn parse_der<'a>(path: &Path, der: &'a [u8]) -> Result<X509Certificate<'a>, InspectError> {
    X509Certificate::from_der(der)
        .map(|(_, x509)| x509)
        .map_err(|e| InspectError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

fn parse_all<'a>(
    path: &Path,
    ders: &'a [Vec<u8>],
) -> Result<Vec<(&'a [u8], X509Certificate<'a>)>, InspectError> {
    ders.iter()
        .map(|der| parse_der(path, der).map(|x509| (der.as_slice(), x509)))
        .collect()
}

fn with_first_certificate<T>(
    path: &Path,
    f: impl FnOnce(&X509Certificate<'_>) -> Result<T, InspectError>,
) -> Result<T, InspectError> {
    let ders = read_certificates(path)?;
    let der = ders.first().ok_or_else(|| InspectError::Missing {
        path: path.to_path_buf(),
        label: "certificate",
    })?;
    let x509 = parse_der(path, der)?;
    f(&x509)
}
