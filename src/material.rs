//! Resolved certificate material.
//!
//! Holds the canonical paths of the artifacts under validation. No
//! validation happens here; checks borrow the material read-only.

use crate::PreflightError;
use std::path::{Path, PathBuf};
use tracing::info;

/// The four input artifacts, resolved to absolute canonical paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateMaterial {
    cert_path: PathBuf,
    key_path: PathBuf,
    req_path: Option<PathBuf>,
    ca_bundle_path: PathBuf,
}

impl CertificateMaterial {
    /// Resolve user-supplied paths.
    ///
    /// The certificate, key and CA bundle are required; the request is
    /// optional and only used for reporting. Symlinks are followed, so every
    /// returned path is absolute and points at an existing file.
    pub fn resolve(
        cert: Option<&Path>,
        key: Option<&Path>,
        req: Option<&Path>,
        ca_bundle: Option<&Path>,
    ) -> Result<Self, PreflightError> {
        let cert = cert.ok_or(PreflightError::MissingInput {
            flag: "-c",
            what: "certificate file",
        })?;
        let key = key.ok_or(PreflightError::MissingInput {
            flag: "-k",
            what: "private key file",
        })?;
        let ca_bundle = ca_bundle.ok_or(PreflightError::MissingInput {
            flag: "-b",
            what: "CA bundle file",
        })?;

        let material = CertificateMaterial {
            cert_path: canonical(cert)?,
            key_path: canonical(key)?,
            req_path: req.map(canonical).transpose()?,
            ca_bundle_path: canonical(ca_bundle)?,
        };

        info!(
            cert = %material.cert_path.display(),
            key = %material.key_path.display(),
            ca_bundle = %material.ca_bundle_path.display(),
            "resolved certificate material"
        );

        Ok(material)
    }

    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    pub fn req_path(&self) -> Option<&Path> {
        self.req_path.as_deref()
    }

    pub fn ca_bundle_path(&self) -> &Path {
        &self.ca_bundle_path
    }
}

fn canonical(path: &Path) -> Result<PathBuf, PreflightError> {
    std::fs::canonicalize(path).map_err(|source| PreflightError::Resolve {
        path: path.to_path_buf(),
        source,
    })
}
