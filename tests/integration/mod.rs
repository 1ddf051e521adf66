//! Integration tests for cert-preflight.
//!
//! Engine tests use the mock inspector; end-to-end tests use the PEM
//! fixtures under `tests/fixtures/`.

pub mod cli_tests;
pub mod output_tests;
