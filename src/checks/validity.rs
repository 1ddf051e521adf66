//! Validity period checks.
//!
//! A certificate whose notAfter is at or before the reference instant is
//! expired. Comparison is done on whole seconds.

use super::{codes, CheckContext};
use crate::CheckResult;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::warn;

/// Whether `not_after` is at or before `now`, at one-second resolution.
pub fn is_expired(not_after: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    not_after.timestamp() <= now.timestamp()
}

/// Execute EXP-001: Certificate Expiration
pub fn run_exp001(ctx: &CheckContext<'_>) -> CheckResult {
    check_not_after(ctx, ctx.material.cert_path(), "Certificate", codes::CERT_EXPIRED)
}

/// Execute EXP-002: CA Bundle Expiration
///
/// Looks at the first certificate of the bundle.
pub fn run_exp002(ctx: &CheckContext<'_>) -> CheckResult {
    check_not_after(ctx, ctx.material.ca_bundle_path(), "CA bundle", codes::BUNDLE_EXPIRED)
}

fn check_not_after(ctx: &CheckContext<'_>, path: &Path, label: &str, code: u8) -> CheckResult {
    let not_after = match ctx.inspector.not_after(path) {
        Ok(not_after) => not_after,
        Err(e) => {
            warn!(error = %e, "cannot read expiry date");
            return CheckResult::fail(
                code,
                format!("{} expiry date could not be read", label),
                e.to_string(),
            );
        }
    };

    let stamp = not_after.format("%Y-%m-%d %H:%M:%S UTC");
    if is_expired(not_after, ctx.now) {
        CheckResult::fail(
            code,
            format!("{} expired on {}", label, stamp),
            format!(
                "notAfter {} is not later than {} ({})",
                not_after.to_rfc3339(),
                ctx.now.to_rfc3339(),
                path.display()
            ),
        )
    } else {
        let days = (not_after - ctx.now).num_days();
        CheckResult::pass(format!("{} valid until {} ({} days left)", label, stamp, days))
    }
}
