use std::collections::BTreeSet;

use triage_core::classify::{classify, extract_signatures, ClassifyError};
use triage_core::model::{ComboIdentity, ComboRecord, IgnoreSet, Outcome};

fn record(block: &str, dump: &str) -> ComboRecord {
    let identity = ComboIdentity::parse("windows-shell-reverse_tcp---generic-none").expect("id");
    ComboRecord::new(identity, dump, block)
}

fn ignore(entries: &str) -> IgnoreSet {
    IgnoreSet::parse(entries)
}

/// A failed combo is classified from its transcript block alone; the alert
/// dump is never scanned, even if it contains new signatures.
#[test]
fn failed_block_skips_alert_scanning() {
    let rec = record(
        "[*] Started reverse TCP handler\n[-] Exploit failed: Operation timed out\n",
        "[**] [1:100:1] would-be new alert [**]",
    );

    let result = classify(&rec, &ignore("")).expect("classify");
    assert_eq!(result.outcome, Outcome::Failed);
    assert!(result.new_alerts.is_empty());
}

/// Intervening text between the marker and the phrase is allowed.
#[test]
fn failed_block_with_intervening_text_still_fails() {
    let rec = record("[-] 10.0.0.2:4444 - Exploit failed: unreachable\n", "");

    let result = classify(&rec, &ignore("")).expect("classify");
    assert_eq!(result.outcome, Outcome::Failed);
}

#[test]
fn bare_marker_without_phrase_aborts() {
    let rec = record("[-] Handler raised an exception\n", "");

    let err = classify(&rec, &ignore("")).unwrap_err();
    match &err {
        ClassifyError::MarkerWithoutFailurePhrase { combo, block } => {
            assert_eq!(combo, "windows-shell-reverse_tcp---generic-none");
            assert!(block.contains("Handler raised"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// The marker/phrase pairing must occur on one line; a phrase on a later
/// line leaves the marker bare, which is an inconsistency.
#[test]
fn marker_and_phrase_on_different_lines_abort() {
    let rec = record("[-] handler died\nExploit failed: timeout\n", "");

    let err = classify(&rec, &ignore("")).unwrap_err();
    assert!(matches!(err, ClassifyError::MarkerWithoutFailurePhrase { .. }));
}

#[test]
fn phrase_without_marker_aborts() {
    let rec = record("Exploit failed: target rejected the stage\n", "");

    let err = classify(&rec, &ignore("")).unwrap_err();
    assert!(matches!(err, ClassifyError::FailurePhraseWithoutMarker { .. }));
}

#[test]
fn no_signatures_classify_as_no_alerts() {
    let rec = record("session opened\n", "plain text, nothing bracketed");

    let result = classify(&rec, &ignore("")).expect("classify");
    assert_eq!(result.outcome, Outcome::NoAlerts);
    assert!(result.new_alerts.is_empty());
}

#[test]
fn all_ignored_signatures_classify_as_no_alerts() {
    let rec = record(
        "session opened\n",
        "[**] [1:408:5] ICMP Echo Reply [**]\n[**] [1:408:5] ICMP Echo Reply [**]\n",
    );

    let result = classify(&rec, &ignore("[**] [1:408:5] ICMP Echo Reply [**]")).expect("classify");
    assert_eq!(result.outcome, Outcome::NoAlerts);
    assert!(result.new_alerts.is_empty());
}

/// Signatures absent from the ignore set classify the combo as NewAlerts,
/// and the contributed set is exactly the deduplicated absent set.
#[test]
fn new_signatures_are_deduplicated() {
    let rec = record(
        "session opened\n",
        "[**] [1:648:8] SHELLCODE x86 NOOP [**]\n\
         [**] [1:408:5] ICMP Echo Reply [**]\n\
         [**] [1:648:8] SHELLCODE x86 NOOP [**]\n",
    );

    let result = classify(&rec, &ignore("[**] [1:408:5] ICMP Echo Reply [**]")).expect("classify");
    assert_eq!(result.outcome, Outcome::NewAlerts);

    let expected: BTreeSet<String> =
        ["[**] [1:648:8] SHELLCODE x86 NOOP [**]".to_string()].into_iter().collect();
    assert_eq!(result.new_alerts, expected);
}

/// Adjacent signatures on one line extract as separate matches.
#[test]
fn extract_signatures_handles_adjacent_matches() {
    let found = extract_signatures("[**alert-A**] ... [**alert-B**]");
    assert_eq!(found, vec!["[**alert-A**]".to_string(), "[**alert-B**]".to_string()]);
}

#[test]
fn extract_signatures_keeps_duplicates_in_dump_order() {
    let found = extract_signatures("[**a**]\n[**b**]\n[**a**]\n");
    assert_eq!(found, vec!["[**a**]", "[**b**]", "[**a**]"]);
}
