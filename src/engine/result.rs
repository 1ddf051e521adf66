//! Result aggregation and reporting.
//!
//! Collects check results in execution order and folds their failure codes
//! into the aggregate exit status.

use crate::{Check, CheckResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub info: u32,
    pub failed: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

impl ResultSummary {
    fn from_checks(checks: &[Check]) -> Self {
        let mut summary = ResultSummary::default();

        for check in checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Info { duration_ms, .. }) => {
                    summary.info += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                None => {}
            }
        }

        summary
    }
}

/// Aggregate outcome of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateStatus {
    /// Bitwise OR of every failing check's code; zero iff nothing failed
    pub exit_code: u8,
}

impl AggregateStatus {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Validation report containing all check results
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// When the report was produced (RFC 3339, UTC)
    pub timestamp: String,
    /// Instant the time-dependent checks were evaluated against
    pub reference_time: DateTime<Utc>,
    pub checks: Vec<Check>,
    pub status: AggregateStatus,
    pub total_duration_ms: u64,
}

impl ValidationReport {
    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_checks(&self.checks)
    }

    /// Failed checks, in execution order
    pub fn failures(&self) -> Vec<&Check> {
        failed(&self.checks)
    }
}

/// Result aggregator for collecting check results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<Check>,
    status: AggregateStatus,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        ResultAggregator::default()
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        if let Some(result) = &check.result {
            self.status.exit_code |= result.error_code();
        }
        self.checks.push(check);
    }

    /// Aggregate status of everything added so far
    pub fn status(&self) -> AggregateStatus {
        self.status
    }

    /// Check if there are any failures
    pub fn has_failures(&self) -> bool {
        !failed(&self.checks).is_empty()
    }

    /// Get only failed checks, in the order they were added
    pub fn failures(&self) -> Vec<&Check> {
        failed(&self.checks)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from_checks(&self.checks)
    }

    /// Create final validation report
    pub fn to_report(
        self,
        reference_time: DateTime<Utc>,
        total_duration_ms: u64,
    ) -> ValidationReport {
        ValidationReport {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            reference_time,
            checks: self.checks,
            status: self.status,
            total_duration_ms,
        }
    }
}

fn failed(checks: &[Check]) -> Vec<&Check> {
    checks
        .iter()
        .filter(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
        .collect()
}
