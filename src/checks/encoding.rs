//! Encoding cleanliness check.
//!
//! Server installers choke on certificate files carrying bytes above 0x7F,
//! typically a UTF-8 or Latin-1 character pasted into a comment or an
//! attribute line of a hand-assembled bundle. Both the CA bundle and the
//! certificate are scanned; the first offending byte of each line is
//! reported.

use super::{codes, CheckContext};
use crate::CheckResult;
use std::path::Path;
use tracing::warn;

/// A line containing at least one byte outside 7-bit ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonAscii {
    /// 1-based line number
    pub line: usize,
    /// 1-based byte column of the first offending byte
    pub column: usize,
    /// Value of the first offending byte
    pub byte: u8,
    /// Number of offending bytes on the line
    pub count: usize,
}

/// Find every line of `data` with a byte above 0x7F.
pub fn scan_non_ascii(data: &[u8]) -> Vec<NonAscii> {
    data.split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, line)| {
            let column = line.iter().position(|b| !b.is_ascii())?;
            Some(NonAscii {
                line: idx + 1,
                column: column + 1,
                byte: line[column],
                count: line.iter().filter(|b| !b.is_ascii()).count(),
            })
        })
        .collect()
}

/// Execute ENC-001: Encoding Cleanliness
pub fn run_enc001(ctx: &CheckContext<'_>) -> CheckResult {
    let mut findings = Vec::new();
    let mut unreadable = Vec::new();

    for path in [ctx.material.ca_bundle_path(), ctx.material.cert_path()] {
        match std::fs::read(path) {
            Ok(data) => {
                findings.extend(scan_non_ascii(&data).into_iter().map(|f| describe(path, &f)))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot scan file");
                unreadable.push(format!("cannot read {}: {}", path.display(), e));
            }
        }
    }

    if !unreadable.is_empty() {
        unreadable.extend(findings);
        return CheckResult::fail(
            codes::NON_ASCII,
            "Certificate files could not be scanned",
            unreadable.join("\n"),
        );
    }

    if findings.is_empty() {
        CheckResult::pass("CA bundle and certificate are 7-bit ASCII")
    } else {
        CheckResult::fail(
            codes::NON_ASCII,
            format!("Found non-ASCII bytes on {} line(s)", findings.len()),
            findings.join("\n"),
        )
    }
}

fn describe(path: &Path, f: &NonAscii) -> String {
    let mut line = format!("{}:{}:{}: byte 0x{:02X}", path.display(), f.line, f.column, f.byte);
    if f.count > 1 {
        line.push_str(&format!(" ({} non-ASCII bytes on this line)", f.count));
    }
    line
}
