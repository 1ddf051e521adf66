//! Validation check modules.
//!
//! Each check is a plain function over a [`CheckContext`]:
//! - Validity: certificate and CA bundle expiration
//! - Constraints: the leaf must not be a CA
//! - Identity: subject display (informational)
//! - Key pair: private key matches the certificate
//! - Trust: chain verification against the CA bundle
//! - Encoding: files are 7-bit clean
//!
//! # Failure handling
//!
//! Checks never panic and never abort the run. An inspection error (missing
//! file, malformed PEM, unsupported key) becomes a `Fail` of the check that
//! hit it, carrying that check's own code and the underlying diagnostic.

pub mod constraints;
pub mod encoding;
pub mod identity;
pub mod keypair;
pub mod trust;
pub mod validity;

use crate::engine::orchestrator::create_all_checks;
use crate::inspect::CertInspector;
use crate::material::CertificateMaterial;
use crate::Check;
use chrono::{DateTime, Utc};

/// Exit-code contributions of failing checks.
///
/// The values overlap (6 = 2|4, 7 = 1|2|4) and two pairs of checks share a
/// code, so an aggregate cannot be decoded back into individual failures.
/// They are kept as-is for compatibility with existing automation.
pub mod codes {
    pub const KEY_MISMATCH: u8 = 2;
    pub const CHAIN_UNVERIFIED: u8 = 4;
    pub const NON_ASCII: u8 = 4;
    pub const CERT_EXPIRED: u8 = 6;
    pub const BUNDLE_EXPIRED: u8 = 7;
    pub const LEAF_IS_CA: u8 = 7;
}

/// Everything a check may look at.
pub struct CheckContext<'a> {
    pub material: &'a CertificateMaterial,
    pub inspector: &'a dyn CertInspector,
    /// Reference instant for time-dependent checks
    pub now: DateTime<Utc>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        material: &'a CertificateMaterial,
        inspector: &'a dyn CertInspector,
        now: DateTime<Utc>,
    ) -> Self {
        CheckContext {
            material,
            inspector,
            now,
        }
    }
}

/// Get all registered checks, in execution order, without results
pub fn get_all_checks() -> Vec<Check> {
    create_all_checks()
        .into_iter()
        .map(|c| Check {
            id: c.id,
            name: c.name,
            description: c.description,
            result: None,
        })
        .collect()
}
