//! Per-combo classification rules.
//!
//! A combo's transcript block decides whether it executed at all; only
//! executed combos have their alert dump scanned. The failure-marker checks
//! are deliberately strict: a malformed marker/phrase pairing means the
//! transcript format assumption no longer holds, and classifying anything
//! further would silently corrupt the statistics, so the whole batch aborts.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::{ClassificationResult, ComboRecord, IgnoreSet};

/// Failure marker followed (on the same line) by the failure phrase.
static FAILED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[-\].* Exploit failed").expect("failed-run pattern"));

/// One bracket-delimited alert signature, e.g. `[**] [1:408:5] ICMP Echo Reply [**]`.
///
/// Non-greedy so adjacent signatures on one line extract separately.
static ALERT_SIGNATURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\*\*.+?\*\*\]").expect("alert-signature pattern"));

/// Bare failure marker.
const FAILURE_MARKER: &str = "[-]";

/// Failure phrase as it appears in transcript blocks.
const FAILURE_PHRASE: &str = "Exploit failed:";

/// Error type for inconsistent transcript blocks.
///
/// Both variants are unrecoverable: they abort the entire batch rather than
/// skipping the offending combo, so ambiguous data is never silently
/// mis-classified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// A `[-]` marker appears without the `Exploit failed` phrase after it.
    #[error(
        "'[-]' in execution record for combo '{combo}', but not followed by 'Exploit failed:'\n{block}"
    )]
    MarkerWithoutFailurePhrase { combo: String, block: String },

    /// The `Exploit failed:` phrase appears without a `[-]` marker before it.
    #[error(
        "'Exploit failed:' in execution record for combo '{combo}', but not preceded by '[-]'\n{block}"
    )]
    FailurePhraseWithoutMarker { combo: String, block: String },
}

/// Classify a single combo against the global ignore set.
///
/// Decision order:
/// 1. Block matches `[-] ... Exploit failed` -> [`Outcome::Failed`]; the
///    alert dump is not scanned.
/// 2. Bare `[-]` without the phrase -> [`ClassifyError::MarkerWithoutFailurePhrase`].
/// 3. `Exploit failed:` without a preceding marker ->
///    [`ClassifyError::FailurePhraseWithoutMarker`].
/// 4. Otherwise the combo executed: extract every bracket-delimited alert
///    signature from the dump, drop those in the ignore set, and deduplicate.
///    A non-empty remainder is [`Outcome::NewAlerts`], otherwise
///    [`Outcome::NoAlerts`].
///
/// Pure given its inputs; no side effects beyond the returned result.
///
/// [`Outcome::Failed`]: crate::model::Outcome::Failed
/// [`Outcome::NewAlerts`]: crate::model::Outcome::NewAlerts
/// [`Outcome::NoAlerts`]: crate::model::Outcome::NoAlerts
pub fn classify(
    record: &ComboRecord,
    ignore: &IgnoreSet,
) -> Result<ClassificationResult, ClassifyError> {
    let block = record.matched_log_block.as_str();

    if FAILED_RUN.is_match(block) {
        return Ok(ClassificationResult::failed());
    }
    if block.contains(FAILURE_MARKER) {
        return Err(ClassifyError::MarkerWithoutFailurePhrase {
            combo: record.identity.filename(),
            block: block.to_string(),
        });
    }
    if block.contains(FAILURE_PHRASE) {
        return Err(ClassifyError::FailurePhraseWithoutMarker {
            combo: record.identity.filename(),
            block: block.to_string(),
        });
    }

    let new_alerts: BTreeSet<String> = extract_signatures(&record.raw_text)
        .into_iter()
        .filter(|signature| !ignore.contains(signature))
        .collect();

    if new_alerts.is_empty() {
        Ok(ClassificationResult::no_alerts())
    } else {
        Ok(ClassificationResult::new_alerts(new_alerts))
    }
}

/// Extract every alert signature occurrence from an alert-dump text.
///
/// Occurrences are returned in dump order, duplicates included; callers
/// decide how to deduplicate.
pub fn extract_signatures(dump: &str) -> Vec<String> {
    ALERT_SIGNATURE.find_iter(dump).map(|m| m.as_str().to_string()).collect()
}
