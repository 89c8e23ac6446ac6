use std::fs;

use combo_triage::{read_input_file, scan_combo_dir, sha256_file};
use tempfile::tempdir;

#[test]
fn scan_combo_dir_splits_combos_from_skipped_entries() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("windows-shell---generic-none"), "[**a**]").expect("combo");
    fs::write(dir.path().join("linux-shell---x86-countdown"), "").expect("combo");
    fs::write(dir.path().join("README.txt"), "not a combo").expect("stray file");
    fs::create_dir(dir.path().join("subdir")).expect("subdir");

    let scan = scan_combo_dir(dir.path()).expect("scan");

    let mut combo_names: Vec<&str> =
        scan.combos.iter().map(|c| c.filename.as_str()).collect();
    combo_names.sort_unstable();
    assert_eq!(combo_names, vec!["linux-shell---x86-countdown", "windows-shell---generic-none"]);

    let mut skipped = scan.skipped.clone();
    skipped.sort_unstable();
    assert_eq!(skipped, vec!["README.txt", "subdir"]);
}

#[test]
fn scan_combo_dir_reads_dump_contents() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("windows-shell---generic-none"), "[**alert**]").expect("combo");

    let scan = scan_combo_dir(dir.path()).expect("scan");
    assert_eq!(scan.combos.len(), 1);
    assert_eq!(scan.combos[0].alert_dump, "[**alert**]");
}

#[test]
fn scan_combo_dir_fails_for_missing_directory() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("nope");

    let err = scan_combo_dir(&missing).unwrap_err();
    assert!(err.to_string().contains("Failed to read combo directory"));
}

#[test]
fn read_input_file_names_the_missing_input() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("ignore.txt");

    let err = read_input_file(&missing, "alerts-to-ignore file").unwrap_err();
    assert!(err.to_string().contains("alerts-to-ignore file"));
}

#[test]
fn sha256_file_matches_known_digest() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("input.txt");
    fs::write(&path, "abc").expect("write input");

    let digest = sha256_file(&path).expect("hash");
    assert_eq!(digest, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}
