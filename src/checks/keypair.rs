//! Key pair check.
//!
//! The private key belongs to the certificate when both carry the same RSA
//! modulus, byte for byte.

use super::{codes, CheckContext};
use crate::inspect::modulus_fingerprint;
use crate::CheckResult;
use tracing::warn;

/// Execute KEY-001: Key/Certificate Match
pub fn run_key001(ctx: &CheckContext<'_>) -> CheckResult {
    let cert = ctx.inspector.cert_modulus(ctx.material.cert_path());
    let key = ctx.inspector.key_modulus(ctx.material.key_path());

    match (cert, key) {
        (Ok(cert), Ok(key)) if cert == key => CheckResult::pass(format!(
            "Private key matches certificate ({}-bit RSA)",
            cert.len() * 8
        )),
        (Ok(cert), Ok(key)) => CheckResult::fail(
            codes::KEY_MISMATCH,
            "Private key does not match certificate",
            format!(
                "certificate modulus {}\nprivate key modulus {}",
                modulus_fingerprint(&cert),
                modulus_fingerprint(&key)
            ),
        ),
        (cert, key) => {
            let errors: Vec<String> = [cert.err(), key.err()]
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect();
            warn!(errors = ?errors, "cannot compare key and certificate");
            CheckResult::fail(
                codes::KEY_MISMATCH,
                "Private key and certificate could not be compared",
                errors.join("\n"),
            )
        }
    }
}
