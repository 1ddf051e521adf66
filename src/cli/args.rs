//! Command line arguments for cert-preflight.
//!
//! Flags mirror the classic preflight script (`-c`, `-k`, `-r`, `-b`), with
//! environment fallbacks for the presentation options.

use crate::DEFAULT_INSTALLER;
use chrono::{DateTime, Utc};
use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

/// Output format selection
#[derive(Debug, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable transcript, streamed as checks complete
    #[default]
    Text,
    /// Machine-readable JSON report
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Junit => write!(f, "junit"),
        }
    }
}

/// Parsed command line arguments
#[derive(Debug, Clone, Parser)]
#[command(name = "cert-preflight")]
#[command(about = "Validate a server certificate, private key and CA bundle before installation")]
#[command(long_about = "
Validate a server certificate, private key and CA bundle before installation.

Every check runs, even after a failure. The exit status is the bitwise OR of
the failure codes of all failing checks:

    EXP-001  certificate expired             6
    EXP-002  CA bundle expired               7
    CON-001  certificate has CA:TRUE         7
    KEY-001  key does not match certificate  2
    TRUST-001 chain does not verify          4
    ENC-001  non-ASCII bytes in PEM files    4

Exit status 1 means the arguments were invalid and nothing was checked.

ENVIRONMENT VARIABLES:
    CERT_PREFLIGHT_FORMAT     Default output format
    CERT_PREFLIGHT_VERBOSE    Verbose output
    CERT_PREFLIGHT_INSTALLER  Installer command shown on success
    NO_COLOR                  Disable colored output
    RUST_LOG                  Log filter for diagnostics on stderr
")]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Server certificate (PEM)
    #[arg(short = 'c', long = "cert", value_name = "CERT_FILE")]
    pub cert: Option<PathBuf>,

    /// Private key matching the certificate (PEM)
    #[arg(short = 'k', long = "key", value_name = "KEY_FILE")]
    pub key: Option<PathBuf>,

    /// Certificate signing request, only used in the installer command
    #[arg(short = 'r', long = "req", value_name = "REQ_FILE")]
    pub req: Option<PathBuf>,

    /// CA bundle used as trust anchors (PEM, one or more certificates)
    #[arg(short = 'b', long = "ca-bundle", value_name = "CA_BUNDLE_FILE")]
    pub ca_bundle: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "CERT_PREFLIGHT_FORMAT")]
    pub format: OutputFormat,

    /// Disable colored output (NO_COLOR set to any non-empty value)
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Verbose output (debug logging and check durations)
    #[arg(short, long, env = "CERT_PREFLIGHT_VERBOSE", value_parser = FalseyValueParser::new())]
    pub verbose: bool,

    /// Evaluate expiry and chain validity at this instant instead of now
    #[arg(long, value_name = "RFC3339", value_parser = parse_rfc3339)]
    pub at: Option<DateTime<Utc>>,

    /// Installer command shown in the success notice
    #[arg(
        long,
        value_name = "CMD",
        default_value = DEFAULT_INSTALLER,
        env = "CERT_PREFLIGHT_INSTALLER"
    )]
    pub installer: String,

    /// List all checks and exit
    #[arg(long)]
    pub list: bool,

    /// Print version information
    #[arg(short = 'V', long)]
    pub version: bool,
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2030-01-01T00:00:00Z ({})", e))
}
