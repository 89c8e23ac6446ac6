//! Run coordination: drive parse, match, classify, and fold over a batch.
//!
//! Frontends hand over the already-read inputs (combo filenames and dump
//! contents, the parsed transcript, the ignore set); everything from identity
//! parsing to the finalized summary happens here so the full pipeline is
//! testable without touching a filesystem.

use thiserror::Error;

use crate::classify::{self, ClassifyError};
use crate::model::{ComboIdentity, ComboRecord, IdentityError, IgnoreSet};
use crate::stats::{AggregateState, StatsSummary};
use crate::transcript::{ExecutionLog, TranscriptError};

/// One combo file as discovered by a frontend: its name and dump content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboInput {
    pub filename: String,
    pub alert_dump: String,
}

impl ComboInput {
    pub fn new(filename: impl Into<String>, alert_dump: impl Into<String>) -> Self {
        Self { filename: filename.into(), alert_dump: alert_dump.into() }
    }
}

/// Every fatal condition a triage run can hit.
///
/// All variants abort the entire batch immediately; there is no per-combo
/// isolation and no partial summary.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
}

/// Classify every combo in the batch and fold the results into a summary.
///
/// Combos are processed in sorted filename order so the report (and the
/// first fatal error, if any) is reproducible regardless of how the frontend
/// enumerated the directory.
pub fn triage(
    combos: &[ComboInput],
    log: &ExecutionLog,
    ignore: &IgnoreSet,
) -> Result<StatsSummary, TriageError> {
    let mut ordered: Vec<&ComboInput> = combos.iter().collect();
    ordered.sort_by(|a, b| a.filename.cmp(&b.filename));

    let mut state = AggregateState::new();
    for combo in ordered {
        let identity = ComboIdentity::parse(&combo.filename)?;
        let block = log.find_record(&identity)?;
        let record = ComboRecord::new(identity, combo.alert_dump.as_str(), block);
        let result = classify::classify(&record, ignore)?;
        state.record(&record.identity, &result);
    }

    Ok(state.finalize())
}
