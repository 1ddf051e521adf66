//! cert-preflight library
//!
//! Pre-installation validation of the certificate material a server is about
//! to be deployed with: the leaf certificate, its private key, the optional
//! certificate request and the CA bundle.
//!
//! This library provides:
//! - A resolved, immutable model of the input artifacts
//! - An X.509 inspection layer (dates, constraints, moduli, chain building)
//! - A fixed registry of seven independent checks
//! - Result aggregation into a bitmask exit status
//! - Terminal, JSON and JUnit reporting
//!
//! # Example
//!
//! ```no_run
//! use cert_preflight::{run_preflight, CertificateMaterial, PreflightConfig};
//!
//! let material = CertificateMaterial::resolve(
//!     Some("server.pem".as_ref()),
//!     Some("server.key".as_ref()),
//!     None,
//!     Some("ca-bundle.pem".as_ref()),
//! )
//! .expect("inputs missing");
//! let report = run_preflight(&PreflightConfig::default(), &material, |_| {});
//! println!("Exit code: {}", report.status.exit_code);
//! ```

pub mod checks;
pub mod cli;
pub mod engine;
pub mod inspect;
pub mod material;
pub mod version;

use chrono::{DateTime, Utc};
use cli::args::{Args, OutputFormat};
use engine::orchestrator::{create_all_checks, CheckOrchestrator};
use engine::result::ValidationReport;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

pub use checks::CheckContext;
pub use engine::result::{AggregateStatus, ResultSummary};
pub use inspect::{CertInspector, InspectError, X509Inspector};
pub use material::CertificateMaterial;

/// Outcome of a single validation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Check passed
    Pass { message: String, duration_ms: u64 },
    /// Informational output, never gates the run
    Info { message: String, duration_ms: u64 },
    /// Check failed with a compatibility exit code
    Fail {
        code: u8,
        message: String,
        details: String,
        duration_ms: u64,
    },
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckResult::Pass {
            message: message.into(),
            duration_ms: 0,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        CheckResult::Info {
            message: message.into(),
            duration_ms: 0,
        }
    }

    pub fn fail(code: u8, message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckResult::Fail {
            code,
            message: message.into(),
            details: details.into(),
            duration_ms: 0,
        }
    }

    /// True for passing and informational outcomes.
    pub fn passed(&self) -> bool {
        !matches!(self, CheckResult::Fail { .. })
    }

    /// The failure code, or zero when the check did not fail.
    pub fn error_code(&self) -> u8 {
        match self {
            CheckResult::Fail { code, .. } => *code,
            _ => 0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CheckResult::Pass { message, .. }
            | CheckResult::Info { message, .. }
            | CheckResult::Fail { message, .. } => message,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Info { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. } => *duration_ms,
        }
    }

    pub(crate) fn with_duration(mut self, elapsed_ms: u64) -> Self {
        match &mut self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Info { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. } => *duration_ms = elapsed_ms,
        }
        self
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "OK: {}", message),
            CheckResult::Info { message, .. } => write!(f, "INFO: {}", message),
            CheckResult::Fail {
                code,
                message,
                details,
                ..
            } => {
                if details.is_empty() {
                    write!(f, "FAIL({}): {}", code, message)
                } else {
                    write!(f, "FAIL({}): {} ({})", code, message, details)
                }
            }
        }
    }
}

/// A validation check with its result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Check {
    /// Unique identifier (e.g., "EXP-001")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// What this check validates
    pub description: String,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
}

/// Errors raised before any check runs.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    /// A required input flag was not supplied
    #[error("missing required {what} ({flag})")]
    MissingInput {
        flag: &'static str,
        what: &'static str,
    },
    /// A supplied path could not be canonicalized
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Default installer invoked in the success notice.
pub const DEFAULT_INSTALLER: &str = "./install.sh";

/// Configuration for a preflight run.
#[derive(Debug, Clone)]
pub struct PreflightConfig {
    pub format: OutputFormat,
    pub color: bool,
    pub verbose: bool,
    /// Evaluate time-dependent checks at this instant instead of now
    pub at: Option<DateTime<Utc>>,
    /// Installer command used in the success notice
    pub installer: String,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        PreflightConfig {
            format: OutputFormat::default(),
            color: true,
            verbose: false,
            at: None,
            installer: DEFAULT_INSTALLER.to_string(),
        }
    }
}

impl PreflightConfig {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Self {
        PreflightConfig {
            format: args.format.clone(),
            color: !args.no_color,
            verbose: args.verbose,
            at: args.at,
            installer: args.installer.clone(),
        }
    }

    /// The instant checks are evaluated against.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

/// Run every registered check against `material`.
///
/// `on_check` is invoked with each completed check, in registry order, as
/// soon as it finishes. The returned report carries the aggregate status.
///
/// # Example
///
/// ```no_run
/// use cert_preflight::{run_preflight, CertificateMaterial, PreflightConfig};
///
/// # let material: CertificateMaterial = unimplemented!();
/// let report = run_preflight(&PreflightConfig::default(), &material, |check| {
///     println!("{}: {:?}", check.id, check.result);
/// });
/// std::process::exit(report.status.exit_code.into());
/// ```
pub fn run_preflight<F>(
    config: &PreflightConfig,
    material: &CertificateMaterial,
    on_check: F,
) -> ValidationReport
where
    F: FnMut(&Check),
{
    let inspector = X509Inspector::new();
    let ctx = CheckContext::new(material, &inspector, config.reference_time());

    let mut orchestrator = CheckOrchestrator::new();
    orchestrator.register_checks(create_all_checks());
    orchestrator.run_all(&ctx, on_check)
}
