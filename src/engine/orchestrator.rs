//! Check execution orchestrator.
//!
//! Runs the registered checks in order against a shared [`CheckContext`].
//!
//! # Graceful Degradation
//!
//! - Check failures never stop the run; every registered check executes.
//! - Check panics: caught via `std::panic::catch_unwind` and recorded as a
//!   failure of that check, carrying its registered failure code.
//! - Empty check list: returns an empty, successful report.

use crate::checks::{codes, constraints, encoding, identity, keypair, trust, validity, CheckContext};
use crate::engine::result::{ResultAggregator, ValidationReport};
use crate::{Check, CheckResult};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error};

/// Signature of a check body.
pub type CheckFn = fn(&CheckContext<'_>) -> CheckResult;

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub description: String,
    pub check_fn: CheckFn,
    /// Code reported if the check body panics
    pub failure_code: u8,
}

/// Check orchestrator
#[derive(Default)]
pub struct CheckOrchestrator {
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    pub fn new() -> Self {
        CheckOrchestrator::default()
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    /// Run all registered checks in registration order.
    ///
    /// `on_check` sees each check as soon as it completes.
    pub fn run_all<F>(&self, ctx: &CheckContext<'_>, mut on_check: F) -> ValidationReport
    where
        F: FnMut(&Check),
    {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new();

        for check in &self.checks {
            let result = self.execute_check(check, ctx);

            let check_struct = Check {
                id: check.id.clone(),
                name: check.name.clone(),
                description: check.description.clone(),
                result: Some(result),
            };

            on_check(&check_struct);
            aggregator.add_result(check_struct);
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            exit_code = aggregator.status().exit_code,
            total_duration_ms, "all checks complete"
        );
        aggregator.to_report(ctx.now, total_duration_ms)
    }

    fn execute_check(&self, check: &RegisteredCheck, ctx: &CheckContext<'_>) -> CheckResult {
        debug!(id = %check.id, "running check");
        let start = Instant::now();

        let result = catch_unwind(AssertUnwindSafe(|| (check.check_fn)(ctx)));
        let elapsed = start.elapsed().as_millis() as u64;

        let result = match result {
            Ok(r) => r,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                error!(id = %check.id, %reason, "check panicked");
                CheckResult::fail(check.failure_code, "Check panicked during execution", reason)
            }
        };

        debug!(id = %check.id, elapsed_ms = elapsed, passed = result.passed(), "check finished");
        result.with_duration(elapsed)
    }
}

/// Create all registered checks with their execution functions
pub fn create_all_checks() -> Vec<RegisteredCheck> {
    vec![
        RegisteredCheck {
            id: "EXP-001".to_string(),
            name: "Certificate Expiration".to_string(),
            description: "Verify the certificate has not reached its notAfter date".to_string(),
            check_fn: validity::run_exp001,
            failure_code: codes::CERT_EXPIRED,
        },
        RegisteredCheck {
            id: "EXP-002".to_string(),
            name: "CA Bundle Expiration".to_string(),
            description: "Verify the first CA bundle certificate has not expired".to_string(),
            check_fn: validity::run_exp002,
            failure_code: codes::BUNDLE_EXPIRED,
        },
        RegisteredCheck {
            id: "CON-001".to_string(),
            name: "CA Flag Absence".to_string(),
            description: "Reject a server certificate with basic constraints CA:TRUE".to_string(),
            check_fn: constraints::run_con001,
            failure_code: codes::LEAF_IS_CA,
        },
        RegisteredCheck {
            id: "ID-001".to_string(),
            name: "Subject Display".to_string(),
            description: "Show the certificate subject (informational)".to_string(),
            check_fn: identity::run_id001,
            failure_code: 0,
        },
        RegisteredCheck {
            id: "KEY-001".to_string(),
            name: "Key/Certificate Match".to_string(),
            description: "Verify the private key modulus matches the certificate".to_string(),
            check_fn: keypair::run_key001,
            failure_code: codes::KEY_MISMATCH,
        },
        RegisteredCheck {
            id: "TRUST-001".to_string(),
            name: "Chain Verification".to_string(),
            description: "Verify the certificate chains to the CA bundle for TLS server use"
                .to_string(),
            check_fn: trust::run_trust001,
            failure_code: codes::CHAIN_UNVERIFIED,
        },
        RegisteredCheck {
            id: "ENC-001".to_string(),
            name: "Encoding Cleanliness".to_string(),
            description: "Verify the CA bundle and certificate contain only ASCII bytes"
                .to_string(),
            check_fn: encoding::run_enc001,
            failure_code: codes::NON_ASCII,
        },
    ]
}
