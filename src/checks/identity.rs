//! Subject display.

use super::CheckContext;
use crate::CheckResult;

/// Execute ID-001: Subject Display
///
/// Informational only; never fails the run.
pub fn run_id001(ctx: &CheckContext<'_>) -> CheckResult {
    match ctx.inspector.subject(ctx.material.cert_path()) {
        Ok(subject) => CheckResult::info(format!("Subject: {}", subject)),
        Err(e) => CheckResult::info(format!("Subject unavailable: {}", e)),
    }
}
