//! Output formatter integration tests.

use crate::mocks::{mock_now, MockInspector, MockMaterial};
use cert_preflight::checks::CheckContext;
use cert_preflight::cli::args::OutputFormat;
use cert_preflight::cli::output::{
    get_formatter, install_command, OutputFormatter, TerminalFormatter,
};
use cert_preflight::engine::orchestrator::{create_all_checks, CheckOrchestrator};
use cert_preflight::engine::result::ValidationReport;
use cert_preflight::{CertificateMaterial, PreflightConfig};

fn report(inspector: &MockInspector, material: &CertificateMaterial) -> ValidationReport {
    let ctx = CheckContext::new(material, inspector, mock_now());
    let mut orchestrator = CheckOrchestrator::new();
    orchestrator.register_checks(create_all_checks());
    orchestrator.run_all(&ctx, |_| {})
}

fn config(format: OutputFormat) -> PreflightConfig {
    PreflightConfig {
        format,
        color: false,
        ..PreflightConfig::default()
    }
}

#[test]
fn test_terminal_transcript() {
    let m = MockMaterial::new();
    let inspector = MockInspector::healthy(&m.material).with_mismatched_key();
    let output = TerminalFormatter::new(false, false).format(&report(&inspector, &m.material));

    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("[OK] EXP-001 Certificate Expiration: "));
    assert!(lines[3].starts_with("[INFO] ID-001 Subject Display: Subject: CN=mock.example.com"));
    assert!(lines[4].starts_with("[FAIL] KEY-001"));
    assert!(lines[5].starts_with("       certificate modulus C1C1C1C1C1C1C1C1..."));
    assert!(output.contains("SUMMARY: 5 passed, 1 informational, 1 failed"));
    assert!(output.contains("Exit code: 2 (failures detected)"));
}

#[test]
fn test_terminal_verbose_shows_durations() {
    let m = MockMaterial::new();
    let inspector = MockInspector::healthy(&m.material);
    let output = TerminalFormatter::new(false, true).format(&report(&inspector, &m.material));

    assert!(output.lines().next().unwrap().ends_with("ms)"));
    assert!(output.contains("Evaluated at: 2030-01-01T00:00:00+00:00"));
}

#[test]
fn test_success_notice_without_request() {
    let m = MockMaterial::new();
    let notice = TerminalFormatter::new(false, false).success_notice(&m.material, "./install.sh");

    assert!(notice.contains(&install_command(&m.material, "./install.sh")));
    assert!(!notice.contains("request:"));
    assert!(!notice.contains(" -r "));
}

#[test]
fn test_install_command_order() {
    let m = MockMaterial::new();
    let cmd = install_command(&m.material, "sudo ./install.sh");

    let c = cmd.find(" -c ").unwrap();
    let k = cmd.find(" -k ").unwrap();
    let b = cmd.find(" -b ").unwrap();
    assert!(cmd.starts_with("sudo ./install.sh -c "));
    assert!(c < k && k < b);
    assert!(cmd.ends_with("ca-bundle.pem"));
}

#[test]
fn test_text_format_selection() {
    let m = MockMaterial::new();
    let r = report(&MockInspector::healthy(&m.material), &m.material);
    let output = get_formatter(&config(OutputFormat::Text), Some(&m.material)).format(&r);
    assert!(output.contains("Exit code: 0 (all checks passed)"));
}

#[cfg(feature = "json")]
#[test]
fn test_json_report() {
    let m = MockMaterial::new();
    let inspector = MockInspector::healthy(&m.material).with_expired_cert();
    let r = report(&inspector, &m.material);
    let output = get_formatter(&config(OutputFormat::Json), Some(&m.material)).format(&r);

    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(doc["status"]["exit_code"], 6);
    assert_eq!(doc["summary"]["failed"], 1);
    assert_eq!(doc["checks"][0]["id"], "EXP-001");
    assert_eq!(doc["checks"][0]["result"]["status"], "fail");
    assert_eq!(doc["checks"][0]["result"]["code"], 6);
    assert_eq!(doc["checks"][3]["result"]["status"], "info");
    assert_eq!(doc["reference_time"], "2030-01-01T00:00:00Z");
    assert!(doc.get("install_command").is_none(), "failed runs carry no install command");
}

#[cfg(feature = "json")]
#[test]
fn test_json_includes_install_command_on_success() {
    let m = MockMaterial::new();
    let r = report(&MockInspector::healthy(&m.material), &m.material);
    let output = get_formatter(&config(OutputFormat::Json), Some(&m.material)).format(&r);

    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        doc["install_command"],
        install_command(&m.material, cert_preflight::DEFAULT_INSTALLER)
    );
}

#[cfg(feature = "junit")]
#[test]
fn test_junit_report() {
    let m = MockMaterial::new();
    let inspector = MockInspector::healthy(&m.material)
        .with_chain_error("unable to get local issuer certificate <root>");
    let r = report(&inspector, &m.material);
    let output = get_formatter(&config(OutputFormat::Junit), None).format(&r);

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuites tests=\"7\" failures=\"1\""));
    assert_eq!(output.matches("<testcase ").count(), 7);
    assert!(output.contains("type=\"exit-code-4\""));
    assert!(output.contains("&lt;root&gt;"));
    assert!(output.ends_with("</testsuites>"));
}
