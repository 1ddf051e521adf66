//! Basic constraints check.
//!
//! A server leaf certificate authorized to sign other certificates is
//! rejected.

use super::{codes, CheckContext};
use crate::CheckResult;
use tracing::warn;

/// Execute CON-001: CA Flag Absence
pub fn run_con001(ctx: &CheckContext<'_>) -> CheckResult {
    let cert = ctx.material.cert_path();

    match ctx.inspector.is_ca(cert) {
        Ok(false) => CheckResult::pass("Certificate is not a CA (CA:TRUE absent)"),
        Ok(true) => {
            let who = ctx
                .inspector
                .subject(cert)
                .unwrap_or_else(|_| cert.display().to_string());
            CheckResult::fail(
                codes::LEAF_IS_CA,
                "Certificate has basic constraints CA:TRUE",
                format!(
                    "{} is authorized to sign other certificates and must not be \
                     installed as a server certificate",
                    who
                ),
            )
        }
        Err(e) => {
            warn!(error = %e, "cannot read basic constraints");
            CheckResult::fail(
                codes::LEAF_IS_CA,
                "Basic constraints could not be read",
                e.to_string(),
            )
        }
    }
}
