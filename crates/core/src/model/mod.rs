//! Core data model for combos, identities, and classification outcomes.
//!
//! A "combo" is one payload/encoder pairing exercised in a test run,
//! represented on disk by a single alert-dump file. Everything here is a
//! plain value type; parsing the combo directory and reading files is the
//! frontend's job.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

/// Delimiter separating the payload and encoder halves of a combo filename.
pub const IDENTITY_DELIMITER: &str = "---";

/// Encoder identity treated as "default/no encoder" in the statistics.
pub const DEFAULT_ENCODER: &str = "generic/none";

/// Error type for combo filename parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The filename has no `---` delimiter and cannot name a combo.
    #[error("combo filename '{0}' does not contain the '---' payload/encoder delimiter")]
    MissingDelimiter(String),

    /// The filename splits into an empty payload or encoder half.
    #[error("combo filename '{0}' has an empty payload or encoder component")]
    EmptyComponent(String),
}

/// Identity of one combo: the payload and encoder it exercised.
///
/// Derived from the combo filename convention
/// `<payload-with-dashes>---<encoder-with-dashes>`, where dashes within each
/// half stand in for path separators in the underlying module naming scheme
/// (e.g. `windows-meterpreter-reverse-tcp---generic-none` names payload
/// `windows/meterpreter/reverse/tcp` with encoder `generic/none`).
///
/// The convention is ambiguous when a component name itself contains a
/// literal dash; that limitation is inherent to the filenames and is
/// contained here rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComboIdentity {
    /// Module-style payload path (e.g. `windows/meterpreter/reverse/tcp`).
    pub payload: String,
    /// Module-style encoder path (e.g. `x86/shikata_ga_nai`).
    pub encoder: String,
}

impl ComboIdentity {
    /// Parse a combo filename into its payload/encoder identity.
    ///
    /// Splits on the first occurrence of `---`, so the payload half must not
    /// itself contain the delimiter. Either half being empty is rejected.
    pub fn parse(filename: &str) -> Result<Self, IdentityError> {
        let (payload, encoder) = filename
            .split_once(IDENTITY_DELIMITER)
            .ok_or_else(|| IdentityError::MissingDelimiter(filename.to_string()))?;

        if payload.is_empty() || encoder.is_empty() {
            return Err(IdentityError::EmptyComponent(filename.to_string()));
        }

        Ok(Self { payload: payload.replace('-', "/"), encoder: encoder.replace('-', "/") })
    }

    /// Reconstruct the combo filename this identity was parsed from.
    ///
    /// Round-trips exactly for component names that contain no literal dash.
    pub fn filename(&self) -> String {
        format!(
            "{}{}{}",
            self.payload.replace('/', "-"),
            IDENTITY_DELIMITER,
            self.encoder.replace('/', "-")
        )
    }

    /// Whether this combo ran with the default/no-op encoder.
    pub fn is_default_encoder(&self) -> bool {
        self.encoder == DEFAULT_ENCODER
    }
}

/// Set of known alert signatures excluded from "new alert" consideration.
///
/// Loaded verbatim from the ignore file, one signature per line with line
/// terminators stripped; order and duplicates are irrelevant.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    signatures: HashSet<String>,
}

impl IgnoreSet {
    /// Build the set from the ignore file's text content.
    pub fn parse(text: &str) -> Self {
        Self { signatures: text.lines().map(str::to_string).collect() }
    }

    /// Whether the given alert signature is a known/acceptable one.
    pub fn contains(&self, signature: &str) -> bool {
        self.signatures.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// One combo ready for classification.
///
/// Constructed once per combo file, consumed by the classifier, then
/// discarded. `raw_text` is the full content of the combo's alert-dump file;
/// `matched_log_block` is the execution-transcript block resolved for this
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboRecord {
    pub identity: ComboIdentity,
    pub raw_text: String,
    pub matched_log_block: String,
}

impl ComboRecord {
    pub fn new(
        identity: ComboIdentity,
        raw_text: impl Into<String>,
        matched_log_block: impl Into<String>,
    ) -> Self {
        Self { identity, raw_text: raw_text.into(), matched_log_block: matched_log_block.into() }
    }
}

/// Outcome bucket for one combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The combo did not execute (`Exploit failed` in its transcript block).
    Failed,
    /// The combo executed but triggered no alerts beyond the ignore set.
    NoAlerts,
    /// The combo executed and triggered at least one new alert.
    NewAlerts,
}

/// Result of classifying a single combo.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClassificationResult {
    pub outcome: Outcome,
    /// Distinct new alert signatures this combo triggered. Empty unless
    /// `outcome` is [`Outcome::NewAlerts`].
    pub new_alerts: BTreeSet<String>,
}

impl ClassificationResult {
    /// Result for a combo whose execution failed; alerts are never scanned.
    pub fn failed() -> Self {
        Self { outcome: Outcome::Failed, new_alerts: BTreeSet::new() }
    }

    /// Result for a combo that executed without triggering new alerts.
    pub fn no_alerts() -> Self {
        Self { outcome: Outcome::NoAlerts, new_alerts: BTreeSet::new() }
    }

    /// Result for a combo that triggered the given deduplicated new alerts.
    pub fn new_alerts(new_alerts: BTreeSet<String>) -> Self {
        Self { outcome: Outcome::NewAlerts, new_alerts }
    }
}
