//! Output formatting for cert-preflight.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: Color disabled via NO_COLOR or --no-color
//! - Empty reports: Produces valid output with zero checks
//! - Formats compiled out: fall back to the terminal formatter
//!
//! All formatters produce valid output for any ValidationReport input.

use crate::cli::args::OutputFormat;
use crate::engine::result::ValidationReport;
use crate::material::CertificateMaterial;
use crate::{Check, CheckResult, PreflightConfig};
use std::path::Path;

const RULE: &str = "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a validation report into a string
    fn format(&self, report: &ValidationReport) -> String;
}

/// Installer invocation for validated material.
///
/// The request is omitted when none was supplied. Paths containing shell
/// metacharacters are single-quoted.
pub fn install_command(material: &CertificateMaterial, installer: &str) -> String {
    let mut cmd = format!(
        "{} -c {} -k {}",
        installer,
        shell_quote(material.cert_path()),
        shell_quote(material.key_path())
    );
    if let Some(req) = material.req_path() {
        cmd.push_str(&format!(" -r {}", shell_quote(req)));
    }
    cmd.push_str(&format!(" -b {}", shell_quote(material.ca_bundle_path())));
    cmd
}

fn shell_quote(path: &Path) -> String {
    let s = path.to_string_lossy();
    let plain = s.chars().all(|c| {
        c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ':' | '@' | ',')
    });
    if plain && !s.is_empty() {
        s.into_owned()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool) -> Self {
        TerminalFormatter { color, verbose }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn gray(&self, text: &str) -> String {
        self.colorize(text, "90")
    }

    /// One transcript entry: the status line, then indented failure details.
    pub fn format_check(&self, check: &Check) -> String {
        let (status, message, details) = match &check.result {
            Some(CheckResult::Pass { message, .. }) => (self.green("[OK]"), message.as_str(), ""),
            Some(CheckResult::Info { message, .. }) => (self.gray("[INFO]"), message.as_str(), ""),
            Some(CheckResult::Fail { message, details, .. }) => {
                (self.red("[FAIL]"), message.as_str(), details.as_str())
            }
            None => (self.gray("[----]"), "Not executed", ""),
        };

        let mut line = format!("{} {} {}: {}", status, check.id, check.name, message);
        if self.verbose {
            if let Some(result) = &check.result {
                line.push_str(&self.gray(&format!(" ({}ms)", result.duration_ms())));
            }
        }
        for detail in details.lines() {
            line.push_str("\n       ");
            line.push_str(detail);
        }
        line
    }

    /// Summary block printed after the last check.
    pub fn format_summary(&self, report: &ValidationReport) -> String {
        let summary = report.summary();
        let mut output = String::new();

        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} passed, {} informational, {} failed\n",
            summary.passed, summary.info, summary.failed
        ));
        if self.verbose {
            output.push_str(&format!("Evaluated at: {}\n", report.reference_time.to_rfc3339()));
            output.push_str(&format!("Total time: {}ms\n", report.total_duration_ms));
        }

        let exit_desc = if report.status.success() {
            "all checks passed"
        } else {
            "failures detected"
        };
        output.push_str(&format!("Exit code: {} ({})\n", report.status.exit_code, exit_desc));
        output.push_str(RULE);

        output
    }

    /// Installation guidance shown when every check passed.
    pub fn success_notice(&self, material: &CertificateMaterial, installer: &str) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&self.green("Certificate material is ready for installation."));
        output.push_str("\n\nRun the installer with the validated files:\n\n    ");
        output.push_str(&install_command(material, installer));
        output.push_str("\n\nValidated files:\n");
        output.push_str(&format!("    certificate:  {}\n", material.cert_path().display()));
        output.push_str(&format!("    private key:  {}\n", material.key_path().display()));
        if let Some(req) = material.req_path() {
            output.push_str(&format!("    request:      {}\n", req.display()));
        }
        output.push_str(&format!("    CA bundle:    {}", material.ca_bundle_path().display()));
        output
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        for check in &report.checks {
            output.push_str(&self.format_check(check));
            output.push('\n');
        }
        output.push_str(&self.format_summary(report));
        output
    }
}

/// JSON formatter
#[cfg(feature = "json")]
pub struct JsonFormatter {
    pretty: bool,
    install_command: Option<String>,
}

#[cfg(feature = "json")]
impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter {
            pretty,
            install_command: None,
        }
    }

    /// Include `cmd` in reports of successful runs.
    pub fn with_install_command(mut self, cmd: String) -> Self {
        self.install_command = Some(cmd);
        self
    }
}

#[cfg(feature = "json")]
impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        #[derive(serde::Serialize)]
        struct Document<'a> {
            #[serde(flatten)]
            report: &'a ValidationReport,
            summary: crate::engine::result::ResultSummary,
            #[serde(skip_serializing_if = "Option::is_none")]
            install_command: Option<&'a str>,
        }

        let doc = Document {
            report,
            summary: report.summary(),
            install_command: self
                .install_command
                .as_deref()
                .filter(|_| report.status.success()),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        rendered.unwrap_or_else(|e| {
            format!("{{\"error\":\"{}\"}}", e.to_string().replace('"', "'"))
        })
    }
}

/// JUnit XML formatter
#[cfg(feature = "junit")]
#[derive(Default)]
pub struct JunitFormatter;

#[cfg(feature = "junit")]
impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

#[cfg(feature = "junit")]
impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &ValidationReport) -> String {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        let time = report.total_duration_ms as f64 / 1000.0;
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" time=\"{:.3}\">\n",
            summary.total, summary.failed, time
        ));
        output.push_str(&format!(
            "  <testsuite name=\"cert-preflight\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"0\" time=\"{:.3}\" timestamp=\"{}\">\n",
            summary.total,
            summary.failed,
            time,
            Self::escape_xml(&report.timestamp)
        ));

        for check in &report.checks {
            let duration = check.result.as_ref().map(|r| r.duration_ms()).unwrap_or(0);
            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"cert-preflight.{}\" time=\"{:.3}\"",
                Self::escape_xml(&check.id),
                Self::escape_xml(&check.name),
                duration as f64 / 1000.0
            ));

            match &check.result {
                Some(CheckResult::Pass { message, .. })
                | Some(CheckResult::Info { message, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <system-out>{}</system-out>\n",
                        Self::escape_xml(message)
                    ));
                    output.push_str("    </testcase>\n");
                }
                Some(CheckResult::Fail {
                    code,
                    message,
                    details,
                    ..
                }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <failure message=\"{}\" type=\"exit-code-{}\">{}</failure>\n",
                        Self::escape_xml(message),
                        code,
                        Self::escape_xml(details)
                    ));
                    output.push_str("    </testcase>\n");
                }
                None => {
                    output.push_str(" />\n");
                }
            }
        }

        output.push_str("  </testsuite>\n");
        output.push_str("</testsuites>");
        output
    }
}

/// Get a formatter for the final report.
///
/// `material` supplies the install command embedded in JSON output.
pub fn get_formatter(
    config: &PreflightConfig,
    material: Option<&CertificateMaterial>,
) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(config.color, config.verbose)),
        #[cfg(feature = "json")]
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(true);
            Box::new(match material {
                Some(m) => formatter.with_install_command(install_command(m, &config.installer)),
                None => formatter,
            })
        }
        #[cfg(feature = "junit")]
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
        #[allow(unreachable_patterns)]
        _ => {
            tracing::warn!(format = %config.format, "output format not compiled in, using text");
            let _ = material;
            Box::new(TerminalFormatter::new(config.color, config.verbose))
        }
    }
}
