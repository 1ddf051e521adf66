//! Chain verification against the CA bundle.

use super::{codes, CheckContext};
use crate::inspect::Purpose;
use crate::CheckResult;
use tracing::{debug, warn};

/// Execute TRUST-001: Chain Verification
///
/// The certificate must chain to an anchor in the CA bundle and be usable
/// for TLS server authentication at the reference time. Every diagnostic the
/// verifier produced is carried into the failure details.
pub fn run_trust001(ctx: &CheckContext<'_>) -> CheckResult {
    let verification = match ctx.inspector.verify_chain(
        ctx.material.cert_path(),
        ctx.material.ca_bundle_path(),
        Purpose::ServerAuth,
        ctx.now,
    ) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "cannot verify chain");
            return CheckResult::fail(
                codes::CHAIN_UNVERIFIED,
                "Certificate chain could not be verified",
                e.to_string(),
            );
        }
    };

    debug!(chain = ?verification.chain, errors = verification.errors.len(), "chain verified");

    if verification.is_valid() {
        CheckResult::pass(format!(
            "Certificate chain verified: {}",
            verification.chain.join(" -> ")
        ))
    } else {
        CheckResult::fail(
            codes::CHAIN_UNVERIFIED,
            format!(
                "Certificate does not verify against CA bundle for {}",
                Purpose::ServerAuth
            ),
            verification.errors.join("\n"),
        )
    }
}
