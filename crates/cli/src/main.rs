use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Parser;
use combo_triage::{read_input_file, report, scan_combo_dir, sha256_file};
use triage_core::model::IgnoreSet;
use triage_core::services::triage;
use triage_core::stats::StatsSummary;
use triage_core::transcript::ExecutionLog;

/// Combo triage CLI.
///
/// This CLI is a thin wrapper around `triage-core` (exposed in code as
/// `triage_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends; this binary owns
/// argument parsing, file access, and rendering.
#[derive(Parser, Debug)]
#[command(
    name = "combo-triage",
    version,
    about = "Classify payload/encoder combo results against an IDS alert baseline",
    long_about = None
)]
struct Cli {
    /// Directory with one alert-dump file per combo (`<payload>---<encoder>` names).
    combo_dir: PathBuf,

    /// File listing known alert signatures to ignore, one per line.
    ignore_file: PathBuf,

    /// Execution transcript with per-combo blocks separated by `-----` lines.
    transcript_file: PathBuf,

    /// Emit the statistics as JSON instead of human-readable text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Envelope for `--json` output: run metadata plus the statistics summary.
#[derive(Debug, serde::Serialize)]
struct RunReport {
    generated_at: String,
    combo_dir: String,
    inputs: Vec<InputDigest>,
    summary: StatsSummary,
}

/// Identifying digest for one global input file.
#[derive(Debug, serde::Serialize)]
struct InputDigest {
    label: &'static str,
    path: String,
    sha256: String,
}

impl InputDigest {
    fn new(label: &'static str, path: &Path) -> Result<Self> {
        Ok(Self { label, path: path.display().to_string(), sha256: sha256_file(path)? })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    // Both global inputs are read up front; an unreadable file terminates
    // the run before any combo is processed.
    let ignore_text = read_input_file(&cli.ignore_file, "alerts-to-ignore file")?;
    let ignore = IgnoreSet::parse(&ignore_text);

    let transcript_text = read_input_file(&cli.transcript_file, "execution transcript")?;
    let log = ExecutionLog::parse(&transcript_text);

    if !cli.json {
        println!("Scanning directory '{}'...", cli.combo_dir.display());
    }

    let scan = scan_combo_dir(&cli.combo_dir)?;
    for skipped in &scan.skipped {
        eprintln!(
            "WARNING: File '{}' does not match the combo naming convention and is excluded from processing.",
            skipped
        );
    }
    if scan.combos.is_empty() {
        bail!(
            "No combos to process found in directory '{}'. Is it the right one?",
            cli.combo_dir.display()
        );
    }

    if !cli.json {
        println!("Found {} combos to process", scan.combos.len());
    }

    let summary = triage(&scan.combos, &log, &ignore)?;

    if cli.json {
        let run_report = RunReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            combo_dir: cli.combo_dir.display().to_string(),
            inputs: vec![
                InputDigest::new("ignore-list", &cli.ignore_file)?,
                InputDigest::new("transcript", &cli.transcript_file)?,
            ],
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&run_report)?);
    } else {
        print!("{}", report::render(&summary));
    }

    Ok(())
}
