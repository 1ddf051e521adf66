//! cert-preflight CLI entry point
//!
//! Pre-installation validation of server certificate material.

use cert_preflight::checks::get_all_checks;
use cert_preflight::cli::args::{Args, OutputFormat};
use cert_preflight::cli::output::{get_formatter, TerminalFormatter};
use cert_preflight::version::get_build_info;
use cert_preflight::{run_preflight, CertificateMaterial, PreflightConfig};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status for argument errors; no check has run.
const USAGE_ERROR: u8 = 1;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(USAGE_ERROR),
            };
        }
    };

    init_logging(args.verbose);

    if args.version {
        println!("{}", get_build_info());
        return ExitCode::SUCCESS;
    }

    if args.list {
        print_check_list();
        return ExitCode::SUCCESS;
    }

    let material = match CertificateMaterial::resolve(
        args.cert.as_deref(),
        args.key.as_deref(),
        args.req.as_deref(),
        args.ca_bundle.as_deref(),
    ) {
        Ok(material) => material,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!();
            eprintln!("{}", Args::command().render_usage());
            eprintln!();
            eprintln!("For more information, try '--help'.");
            return ExitCode::from(USAGE_ERROR);
        }
    };

    let config = PreflightConfig::from_args(&args);
    debug!(?config, "starting preflight");

    let code = match config.format {
        OutputFormat::Text => run_text(&config, &material),
        _ => run_structured(&config, &material),
    };
    ExitCode::from(code)
}

/// Diagnostics go to stderr so they never mix with the transcript.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_text(config: &PreflightConfig, material: &CertificateMaterial) -> u8 {
    let formatter = TerminalFormatter::new(config.color, config.verbose);

    let report = run_preflight(config, material, |check| {
        println!("{}", formatter.format_check(check));
    });

    println!("{}", formatter.format_summary(&report));
    if report.status.success() {
        println!("{}", formatter.success_notice(material, &config.installer));
    }
    report.status.exit_code
}

fn run_structured(config: &PreflightConfig, material: &CertificateMaterial) -> u8 {
    let report = run_preflight(config, material, |_| {});
    println!("{}", get_formatter(config, Some(material)).format(&report));
    report.status.exit_code
}

fn print_check_list() {
    println!("Available checks (run in this order):");
    println!();
    for check in get_all_checks() {
        println!("  {:<10} {}", check.id, check.name);
        println!("  {:<10} {}", "", check.description);
    }
}
