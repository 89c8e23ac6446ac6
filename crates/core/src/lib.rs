//! triage-core
//!
//! Core library for classifying payload/encoder combo results against an
//! intrusion-detection alert baseline.
//!
//! This crate defines the combo data model, the execution-transcript matcher,
//! the per-combo classification rules, and the statistics aggregation.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, batch harnesses, etc.). All inputs
//! arrive as already-read text; file discovery and reading belong to the
//! frontends.

pub mod classify;
pub mod model;
pub mod services;
pub mod stats;
pub mod transcript;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
