//! Certificate path building and verification.
//!
//! Every certificate in the CA bundle is a candidate anchor. Starting at the
//! leaf, each step looks for an issuer (first among the extra certificates
//! presented with the leaf, then in the bundle) whose subject matches and
//! whose key verifies the signature. The path is trusted once it reaches a
//! self-signed certificate that is present in the bundle.
//!
//! Checks performed along the way:
//! 1. Signature of every link
//! 2. Validity window of every certificate at the reference instant
//! 3. Basic constraints of every issuer
//! 4. Extended and basic key usage of the leaf for the requested purpose
//!
//! Problems are collected, not returned early, so the operator sees all of
//! them.

use super::Purpose;
use x509_parser::prelude::*;

/// Maximum number of issuers walked above the leaf.
const MAX_CHAIN_DEPTH: usize = 32;

/// A parsed certificate alongside its DER encoding.
pub(crate) type Parsed<'a> = (&'a [u8], X509Certificate<'a>);

/// Outcome of a chain verification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verification {
    /// Subjects on the built path, leaf first.
    pub chain: Vec<String>,
    /// Diagnostics; empty when the chain verified.
    pub errors: Vec<String>,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) fn verify<'a>(
    leaf: &'a Parsed<'a>,
    intermediates: &'a [Parsed<'a>],
    anchors: &'a [Parsed<'a>],
    purpose: Purpose,
    at: i64,
) -> Verification {
    let mut result = Verification::default();
    let (_, leaf_x509) = leaf;

    check_purpose(leaf_x509, purpose, &mut result.errors);

    let mut current = leaf;
    let mut depth = 0;
    loop {
        let (current_der, x509) = current;
        let subject = x509.subject().to_string();
        result.chain.push(subject.clone());
        check_time(x509, depth, &subject, at, &mut result.errors);
        if depth > 0 {
            check_issuer_constraints(x509, depth, &subject, &mut result.errors);
        }

        if is_self_signed(x509) {
            if !anchors.iter().any(|(der, _)| der == current_der) {
                let reason = if depth == 0 {
                    "self-signed certificate not present in CA bundle"
                } else {
                    "self-signed certificate in certificate chain"
                };
                result.errors.push(format!("depth {} ({}): {}", depth, subject, reason));
            }
            break;
        }

        if depth >= MAX_CHAIN_DEPTH {
            result.errors.push(format!(
                "depth {} ({}): certificate chain too long",
                depth, subject
            ));
            break;
        }

        let candidates: Vec<&Parsed<'a>> = intermediates
            .iter()
            .chain(anchors.iter())
            .filter(|(_, issuer)| issuer.subject().as_raw() == x509.issuer().as_raw())
            .collect();

        let issuer = candidates
            .iter()
            .find(|(_, issuer)| x509.verify_signature(Some(issuer.public_key())).is_ok());

        match issuer {
            Some(next) => {
                current = *next;
                depth += 1;
            }
            None if candidates.is_empty() => {
                result.errors.push(format!(
                    "depth {} ({}): unable to get local issuer certificate ({})",
                    depth,
                    subject,
                    x509.issuer()
                ));
                break;
            }
            None => {
                result.errors.push(format!(
                    "depth {} ({}): certificate signature failure against {} candidate issuer(s) named {}",
                    depth,
                    subject,
                    candidates.len(),
                    x509.issuer()
                ));
                break;
            }
        }
    }

    result
}

fn is_self_signed(x509: &X509Certificate<'_>) -> bool {
    x509.subject().as_raw() == x509.issuer().as_raw() && x509.verify_signature(None).is_ok()
}

fn check_time(
    x509: &X509Certificate<'_>,
    depth: usize,
    subject: &str,
    at: i64,
    errors: &mut Vec<String>,
) {
    let validity = x509.validity();
    if at < validity.not_before.timestamp() {
        errors.push(format!(
            "depth {} ({}): certificate is not yet valid (notBefore {})",
            depth, subject, validity.not_before
        ));
    }
    if at > validity.not_after.timestamp() {
        errors.push(format!(
            "depth {} ({}): certificate has expired (notAfter {})",
            depth, subject, validity.not_after
        ));
    }
}

fn check_issuer_constraints(
    x509: &X509Certificate<'_>,
    depth: usize,
    subject: &str,
    errors: &mut Vec<String>,
) {
    match x509.basic_constraints() {
        Ok(Some(bc)) if !bc.value.ca => errors.push(format!(
            "depth {} ({}): issuer is not a CA (CA:FALSE)",
            depth, subject
        )),
        Ok(Some(bc)) => {
            if let Some(pathlen) = bc.value.path_len_constraint {
                let below = depth.saturating_sub(1) as u32;
                if below > pathlen {
                    errors.push(format!(
                        "depth {} ({}): path length constraint exceeded (pathlen={}, intermediates below={})",
                        depth, subject, pathlen, below
                    ));
                }
            }
        }
        // v1 and v2 certificates predate extensions and are accepted as issuers
        Ok(None) if x509.version() != X509Version::V3 => {}
        Ok(None) => errors.push(format!(
            "depth {} ({}): issuer has no basic constraints",
            depth, subject
        )),
        Err(e) => errors.push(format!(
            "depth {} ({}): unreadable basic constraints: {}",
            depth, subject, e
        )),
    }
}

fn check_purpose(leaf: &X509Certificate<'_>, purpose: Purpose, errors: &mut Vec<String>) {
    let subject = leaf.subject();

    match leaf.extended_key_usage() {
        Ok(Some(eku)) => {
            let eku = eku.value;
            let allowed = eku.any
                || match purpose {
                    Purpose::ServerAuth => eku.server_auth,
                    Purpose::ClientAuth => eku.client_auth,
                };
            if !allowed {
                errors.push(format!(
                    "depth 0 ({}): unsuitable certificate purpose: extended key usage does not permit {}",
                    subject, purpose
                ));
            }
        }
        Ok(None) => {}
        Err(e) => errors.push(format!(
            "depth 0 ({}): unreadable extended key usage: {}",
            subject, e
        )),
    }

    match leaf.key_usage() {
        Ok(Some(ku)) => {
            let ku = ku.value;
            let allowed = match purpose {
                Purpose::ServerAuth => {
                    ku.digital_signature() || ku.key_encipherment() || ku.key_agreement()
                }
                Purpose::ClientAuth => ku.digital_signature() || ku.key_agreement(),
            };
            if !allowed {
                errors.push(format!(
                    "depth 0 ({}): unsuitable certificate purpose: key usage does not permit {}",
                    subject, purpose
                ));
            }
        }
        Ok(None) => {}
        Err(e) => errors.push(format!(
            "depth 0 ({}): unreadable key usage: {}",
            subject, e
        )),
    }
}
