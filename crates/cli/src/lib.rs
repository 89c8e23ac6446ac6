use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use triage_core::model::IDENTITY_DELIMITER;
use triage_core::services::ComboInput;

pub mod report;

/// Result of scanning a combo directory: the combo files found (name plus
/// alert-dump content) and the names of entries skipped for not matching
/// the combo naming convention.
#[derive(Debug, Default)]
pub struct ComboScan {
    pub combos: Vec<ComboInput>,
    pub skipped: Vec<String>,
}

/// Scan a flat directory for combo files and read their alert dumps.
///
/// Every regular file whose name contains the `---` delimiter is treated as
/// a combo. Other entries (and subdirectories) are collected in `skipped`
/// so the caller can warn about them.
pub fn scan_combo_dir(dir: &Path) -> Result<ComboScan> {
    let mut scan = ComboScan::default();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read combo directory '{}'", dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read entry in '{}'", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();

        if !entry.file_type()?.is_file() || !name.contains(IDENTITY_DELIMITER) {
            scan.skipped.push(name);
            continue;
        }

        let dump = fs::read_to_string(entry.path())
            .with_context(|| format!("Failed to read combo file '{}'", entry.path().display()))?;
        scan.combos.push(ComboInput::new(name, dump));
    }

    Ok(scan)
}

/// Read one of the required global input files.
///
/// Failures here terminate the run before any combo processing begins, so
/// the message names which input was unreadable.
pub fn read_input_file(path: &Path, label: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} at '{}'", label, path.display()))
}

/// Compute the SHA-256 hash of a file and return it as a hex string.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open input for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read input for hashing: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    let digest = hasher.finalize();
    Ok(format!("{:x}", digest))
}
