//! X.509 inspection layer.
//!
//! Everything the checks need to know about certificate material goes
//! through [`CertInspector`]: validity dates, basic constraints, subject
//! names, RSA moduli and chain verification. [`X509Inspector`] is the
//! production implementation; tests substitute their own.
//!
//! Inspection never panics. Unreadable files, malformed PEM and key types
//! that cannot be compared all surface as [`InspectError`], which the
//! calling check turns into its own failure.

pub mod chain;
pub mod key;
pub mod x509;

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

pub use chain::Verification;
pub use x509::X509Inspector;

/// Errors raised while inspecting certificate material.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: malformed PEM: {message}", path.display())]
    Pem { path: PathBuf, message: String },
    #[error("{}: no {label} found", path.display())]
    Missing { path: PathBuf, label: &'static str },
    #[error("{}: invalid certificate: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{}: unsupported key: {message}", path.display())]
    UnsupportedKey { path: PathBuf, message: String },
}

/// Extended key usage a chain is verified for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// TLS server authentication (id-kp-serverAuth)
    ServerAuth,
    /// TLS client authentication (id-kp-clientAuth)
    ClientAuth,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::ServerAuth => write!(f, "TLS server authentication"),
            Purpose::ClientAuth => write!(f, "TLS client authentication"),
        }
    }
}

/// Read access to certificate attributes.
///
/// Certificate methods look at the first certificate in the given PEM file.
pub trait CertInspector {
    /// End of the validity period.
    fn not_after(&self, cert: &Path) -> Result<DateTime<Utc>, InspectError>;

    /// Whether basic constraints carry CA:TRUE. An absent extension is `false`.
    fn is_ca(&self, cert: &Path) -> Result<bool, InspectError>;

    /// Subject distinguished name in one-line form.
    fn subject(&self, cert: &Path) -> Result<String, InspectError>;

    /// Big-endian RSA modulus of the certificate's public key, without
    /// leading zero bytes.
    fn cert_modulus(&self, cert: &Path) -> Result<Vec<u8>, InspectError>;

    /// Big-endian RSA modulus of a private key, without leading zero bytes.
    fn key_modulus(&self, key: &Path) -> Result<Vec<u8>, InspectError>;

    /// Verify `cert` against the anchors in `ca_bundle` for `purpose` at
    /// instant `at`. Verification problems are reported in the returned
    /// [`Verification`]; `Err` is reserved for unreadable input.
    fn verify_chain(
        &self,
        cert: &Path,
        ca_bundle: &Path,
        purpose: Purpose,
        at: DateTime<Utc>,
    ) -> Result<Verification, InspectError>;
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, InspectError> {
    std::fs::read(path).map_err(|source| InspectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Short hex fingerprint of a modulus for diagnostics.
pub fn modulus_fingerprint(modulus: &[u8]) -> String {
    let head: String = modulus.iter().take(8).map(|b| format!("{:02X}", b)).collect();
    format!("{}... ({} bits)", head, modulus.len() * 8)
}

pub(crate) fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
