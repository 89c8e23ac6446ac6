//! Statistics aggregation over per-combo classification results.
//!
//! The aggregation is an explicit fold: one [`AggregateState`] value is
//! threaded through the batch and updated in place for each result, then
//! finalized into an immutable [`StatsSummary`]. Keeping the accumulator
//! explicit (instead of module-level counters) makes the fold independently
//! testable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{ClassificationResult, ComboIdentity, Outcome};

/// Percentage of `count` over `denominator`, rounded to two decimal places.
///
/// Returns `None` when the denominator is zero (e.g. no successfully
/// executed combos at all); derived statistics render that as `N/A` instead
/// of faulting.
pub fn percentage(count: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    Some((count as f64 / denominator as f64 * 10_000.0).round() / 100.0)
}

/// Counts split by whether the combo used the default encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSplit {
    pub default_encoder: usize,
    pub other_encoder: usize,
}

impl EncoderSplit {
    fn record(&mut self, default_encoder: bool) {
        if default_encoder {
            self.default_encoder += 1;
        } else {
            self.other_encoder += 1;
        }
    }
}

/// How many distinct combos triggered one new alert signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFrequency {
    pub signature: String,
    pub combos: usize,
}

/// Guarded percentage rates derived from the final counters.
///
/// Every field is `None` when its denominator was zero. Failed is rated
/// over all combos; the remaining rates are over the successfully-executed
/// combos (or the matching encoder sub-bucket thereof).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    pub failed: Option<f64>,
    pub new_alerts: Option<f64>,
    pub no_alerts: Option<f64>,
    pub new_alerts_default_encoder: Option<f64>,
    pub no_alerts_default_encoder: Option<f64>,
    pub new_alerts_other_encoder: Option<f64>,
    pub no_alerts_other_encoder: Option<f64>,
}

/// Finalized, read-only statistics for one triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total: usize,
    pub failed: usize,
    pub no_alerts: usize,
    pub new_alerts: usize,
    /// Combos that executed at all (`no_alerts + new_alerts`).
    pub executed: usize,
    pub executed_split: EncoderSplit,
    pub new_alerts_split: EncoderSplit,
    pub no_alerts_split: EncoderSplit,
    pub rates: Rates,
    /// New alert signatures ordered by descending combo count, ties broken
    /// by signature text.
    pub ranking: Vec<AlertFrequency>,
    /// Whether the three outcome buckets sum to the total combo count. A
    /// mismatch can only arise from a logic defect and is reported as a
    /// warning, not a fatal error.
    pub buckets_consistent: bool,
}

/// Running accumulator for the batch fold.
///
/// Updated in place by the single control thread as each combo's
/// classification arrives; no other mutable state is shared across combos.
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    total: usize,
    failed: usize,
    no_alerts: usize,
    new_alerts: usize,
    executed_split: EncoderSplit,
    new_alerts_split: EncoderSplit,
    no_alerts_split: EncoderSplit,
    alert_frequency: HashMap<String, usize>,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combos folded in so far.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Fold one combo's classification into the running counters.
    ///
    /// Failed combos count only toward the total and the failed bucket; the
    /// encoder breakdown covers successfully-executed combos. A `NewAlerts`
    /// combo contributes each of its distinct signatures once to the global
    /// frequency counter, regardless of how often the signature occurred in
    /// its dump.
    pub fn record(&mut self, identity: &ComboIdentity, result: &ClassificationResult) {
        self.total += 1;

        match result.outcome {
            Outcome::Failed => {
                self.failed += 1;
            }
            Outcome::NoAlerts => {
                let default_encoder = identity.is_default_encoder();
                self.no_alerts += 1;
                self.executed_split.record(default_encoder);
                self.no_alerts_split.record(default_encoder);
            }
            Outcome::NewAlerts => {
                let default_encoder = identity.is_default_encoder();
                self.new_alerts += 1;
                self.executed_split.record(default_encoder);
                self.new_alerts_split.record(default_encoder);
                for signature in &result.new_alerts {
                    *self.alert_frequency.entry(signature.clone()).or_insert(0) += 1;
                }
            }
        }
    }

    /// Finalize the fold into an immutable summary with derived rates and
    /// the new-alert frequency ranking.
    pub fn finalize(self) -> StatsSummary {
        let executed = self.no_alerts + self.new_alerts;
        let buckets_consistent = self.failed + self.no_alerts + self.new_alerts == self.total;

        let rates = Rates {
            failed: percentage(self.failed, self.total),
            new_alerts: percentage(self.new_alerts, executed),
            no_alerts: percentage(self.no_alerts, executed),
            new_alerts_default_encoder: percentage(
                self.new_alerts_split.default_encoder,
                self.executed_split.default_encoder,
            ),
            no_alerts_default_encoder: percentage(
                self.no_alerts_split.default_encoder,
                self.executed_split.default_encoder,
            ),
            new_alerts_other_encoder: percentage(
                self.new_alerts_split.other_encoder,
                self.executed_split.other_encoder,
            ),
            no_alerts_other_encoder: percentage(
                self.no_alerts_split.other_encoder,
                self.executed_split.other_encoder,
            ),
        };

        let mut ranking: Vec<AlertFrequency> = self
            .alert_frequency
            .into_iter()
            .map(|(signature, combos)| AlertFrequency { signature, combos })
            .collect();
        ranking.sort_by(|a, b| b.combos.cmp(&a.combos).then_with(|| a.signature.cmp(&b.signature)));

        StatsSummary {
            total: self.total,
            failed: self.failed,
            no_alerts: self.no_alerts,
            new_alerts: self.new_alerts,
            executed,
            executed_split: self.executed_split,
            new_alerts_split: self.new_alerts_split,
            no_alerts_split: self.no_alerts_split,
            rates,
            ranking,
            buckets_consistent,
        }
    }
}
