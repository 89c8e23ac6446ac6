//! Human-readable rendering of a finalized statistics summary.
//!
//! Layout only; every number and rate is computed in `triage-core`. Rates
//! whose denominator was zero render as `N/A`.

use triage_core::stats::StatsSummary;

/// Format a guarded rate for display.
pub fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.2}%", value),
        None => "N/A".to_string(),
    }
}

/// Render the full text report for one triage run.
pub fn render(summary: &StatsSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "combos_failed: {} ({})\n",
        summary.failed,
        fmt_rate(summary.rates.failed)
    ));

    out.push_str("\n--------- Combo Statistics All -----------\n");
    out.push_str(&format!("* Combos successfully executed: {}\n", summary.executed));
    out.push_str(&format!(
        "  ->  combos_new_alerts: {} ({})\n",
        summary.new_alerts,
        fmt_rate(summary.rates.new_alerts)
    ));
    out.push_str(&format!(
        "  ->  combos_no_alerts: {} ({})\n",
        summary.no_alerts,
        fmt_rate(summary.rates.no_alerts)
    ));

    out.push_str("\n------- Combo Statistics default/no encoder --------\n");
    out.push_str(&format!(
        "* Combos successfully executed with default/no encoder: {}\n",
        summary.executed_split.default_encoder
    ));
    out.push_str(&format!(
        "  ->  combos_new_alerts with default/no encoder: {} ({})\n",
        summary.new_alerts_split.default_encoder,
        fmt_rate(summary.rates.new_alerts_default_encoder)
    ));
    out.push_str(&format!(
        "  ->  combos_no_new_alerts with default/no encoder: {} ({})\n",
        summary.no_alerts_split.default_encoder,
        fmt_rate(summary.rates.no_alerts_default_encoder)
    ));

    out.push_str("\n------- Combo Statistics with other encoders --------\n");
    out.push_str(&format!(
        "* Combos successfully executed with other encoder: {}\n",
        summary.executed_split.other_encoder
    ));
    out.push_str(&format!(
        "  ->  combos_new_alerts with other encoder: {} ({})\n",
        summary.new_alerts_split.other_encoder,
        fmt_rate(summary.rates.new_alerts_other_encoder)
    ));
    out.push_str(&format!(
        "  ->  combos_no_new_alerts with other encoder: {} ({})\n",
        summary.no_alerts_split.other_encoder,
        fmt_rate(summary.rates.no_alerts_other_encoder)
    ));
    out.push_str("--------------------------------------------------------\n");

    if summary.buckets_consistent {
        out.push_str(&format!("\nTotal combos: {}\n", summary.total));
    } else {
        let bucket_sum = summary.failed + summary.no_alerts + summary.new_alerts;
        out.push_str(&format!(
            "WARNING: Total of the outcome buckets ({}) does not match the overall combo count ({})\n",
            bucket_sum, summary.total
        ));
    }

    if !summary.ranking.is_empty() {
        out.push_str("\n---------------- New alerts Statistics -----------------\n");
        out.push_str("Top triggered new alerts (found in nr of combos):\n");
        for entry in &summary.ranking {
            out.push_str(&format!("{}   {}\n", entry.combos, entry.signature));
        }
        out.push_str("-------------------------------------------------------\n");
    }

    out
}
