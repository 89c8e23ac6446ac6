//! Execution-transcript parsing and per-combo record lookup.
//!
//! The transcript is the combined output of attempting to run every combo,
//! segmented into free-text blocks by lines consisting of `-----`. Each block
//! is expected to mention the payload and encoder identifiers of exactly one
//! combo, each on its own line, plus optionally the failure markers the
//! classifier looks for. No further structure is imposed on a block.

use thiserror::Error;

use crate::model::ComboIdentity;

/// Section delimiter between transcript blocks (a line of five dashes).
const BLOCK_DELIMITER: &str = "-----\n";

/// Error type for transcript lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    /// No transcript block mentions this combo's payload and encoder.
    ///
    /// Every combo presented for classification must have an execution
    /// record; a miss means the combo directory and the transcript are out
    /// of sync, and the whole batch aborts.
    #[error("no execution record found for payload '{payload}' with encoder '{encoder}'")]
    RecordNotFound { payload: String, encoder: String },
}

/// Ordered sequence of execution-record blocks from one transcript file.
#[derive(Debug, Clone)]
pub struct ExecutionLog {
    blocks: Vec<String>,
}

impl ExecutionLog {
    /// Split the transcript text into its record blocks.
    pub fn parse(text: &str) -> Self {
        Self { blocks: text.split(BLOCK_DELIMITER).map(str::to_string).collect() }
    }

    /// All blocks in file order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Find the execution record for the given combo identity.
    ///
    /// Returns the first block containing both the payload and the encoder,
    /// each immediately followed by a line break. Blocks are searched in
    /// file order and the first match wins; uniqueness is not guaranteed, so
    /// an ambiguous transcript silently resolves to the earliest block.
    pub fn find_record(&self, identity: &ComboIdentity) -> Result<&str, TranscriptError> {
        let payload_line = format!("{}\n", identity.payload);
        let encoder_line = format!("{}\n", identity.encoder);

        self.blocks
            .iter()
            .find(|block| block.contains(&payload_line) && block.contains(&encoder_line))
            .map(String::as_str)
            .ok_or_else(|| TranscriptError::RecordNotFound {
                payload: identity.payload.clone(),
                encoder: identity.encoder.clone(),
            })
    }
}
