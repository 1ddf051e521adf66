//! CLI integration tests.
//!
//! Run the built binary and check exit codes and stream separation.

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

fn run_with_env(args: &[&str], vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_cert-preflight"));
    cmd.args(args)
        .env_remove("CERT_PREFLIGHT_FORMAT")
        .env_remove("CERT_PREFLIGHT_VERBOSE")
        .env_remove("CERT_PREFLIGHT_INSTALLER")
        .env_remove("NO_COLOR")
        .env_remove("RUST_LOG");
    for (key, value) in vars {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

fn run(args: &[&str]) -> Output {
    run_with_env(args, &[("NO_COLOR", "1")])
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_missing_required_flag_exits_1() {
    let cert = fixture("server.pem");
    let output = run(&["-c", &cert, "-k", &fixture("server.key")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty(), "no checks may run");
    let err = stderr(&output);
    assert!(err.contains("-b"), "{}", err);
    assert!(err.contains("Usage:"), "{}", err);
}

#[test]
fn test_nonexistent_file_exits_1() {
    let output = run(&[
        "-c",
        "/nonexistent/server.pem",
        "-k",
        &fixture("server.key"),
        "-b",
        &fixture("ca.pem"),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_unknown_flag_exits_1() {
    let output = run(&["--frobnicate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_help_exits_0() {
    let output = run(&["-h"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("--ca-bundle"));
}

#[test]
fn test_version() {
    let output = run(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("cert-preflight "));
}

#[test]
fn test_list() {
    let output = run(&["--list"]);
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    for id in ["EXP-001", "EXP-002", "CON-001", "ID-001", "KEY-001", "TRUST-001", "ENC-001"] {
        assert!(out.contains(id), "missing {} in {}", id, out);
    }
}

#[test]
fn test_success_prints_transcript_and_notice() {
    let output = run(&[
        "-c",
        &fixture("server.pem"),
        "-k",
        &fixture("server.key"),
        "-r",
        &fixture("server.csr"),
        "-b",
        &fixture("bundle.pem"),
        "--installer",
        "/opt/app/install.sh",
    ]);

    assert_eq!(output.status.code(), Some(0), "{}", stdout(&output));
    let out = stdout(&output);
    assert_eq!(out.lines().filter(|l| l.starts_with("[OK]")).count(), 6);
    assert_eq!(out.lines().filter(|l| l.starts_with("[INFO]")).count(), 1);
    assert!(out.contains("/opt/app/install.sh -c "));
    assert!(out.contains(" -r "));
    assert!(!out.contains("\x1b["));
}

#[test]
fn test_failure_exit_code_is_or_of_codes() {
    let output = run(&[
        "-c",
        &fixture("server.pem"),
        "-k",
        &fixture("other.key"),
        "-b",
        &fixture("rogue-ca.pem"),
    ]);

    // Key mismatch (2) | chain (4)
    assert_eq!(output.status.code(), Some(6));
    let out = stdout(&output);
    assert!(out.contains("[FAIL] KEY-001"));
    assert!(out.contains("[FAIL] TRUST-001"));
    assert!(!out.contains("install.sh"), "no success notice on failure");
}

#[test]
fn test_at_flag_moves_reference_time() {
    let output = run(&[
        "-c",
        &fixture("selfsigned.pem"),
        "-k",
        &fixture("selfsigned.key"),
        "-b",
        &fixture("selfsigned.pem"),
        "--at",
        "2200-01-01T00:00:00Z",
    ]);

    // Certificate (6) | bundle (7) | chain (4)
    assert_eq!(output.status.code(), Some(7));
}

#[cfg(feature = "json")]
#[test]
fn test_json_output() {
    let output = run(&[
        "-c",
        &fixture("selfsigned.pem"),
        "-k",
        &fixture("selfsigned.key"),
        "-b",
        &fixture("selfsigned.pem"),
        "--format",
        "json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["status"]["exit_code"], 0);
    assert_eq!(doc["checks"].as_array().unwrap().len(), 7);
    assert!(doc["install_command"].as_str().unwrap().starts_with("./install.sh -c "));
}

#[test]
fn test_no_color_accepts_any_value() {
    let cert = fixture("selfsigned.pem");
    let key = fixture("selfsigned.key");
    for value in ["1", "yes-please", "true"] {
        let output = run_with_env(&["-c", &cert, "-k", &key, "-b", &cert], &[("NO_COLOR", value)]);

        assert_eq!(output.status.code(), Some(0), "NO_COLOR={}: {}", value, stderr(&output));
        let out = stdout(&output);
        assert_eq!(out.lines().filter(|l| l.starts_with("[OK]")).count(), 6);
        assert!(!out.contains("\x1b["), "NO_COLOR={} left escapes in {}", value, out);
    }
}

#[test]
fn test_verbose_env_accepts_numeric_value() {
    let output = run_with_env(&["--list"], &[("CERT_PREFLIGHT_VERBOSE", "1")]);
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("EXP-001"));
}
