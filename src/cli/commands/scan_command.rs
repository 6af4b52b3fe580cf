//! Scan command feature.
//!
//! This module owns and handles the "tidyup scan" command behavior.

use crate::cli::TargetArgs;
use crate::config::Config;
use crate::filter::ScanFilter;
use crate::output::{self, OutputMode};
use crate::progress;
use crate::scanner::{ScanResult, Scanner};
use anyhow::{bail, Context};
use std::sync::mpsc;

pub(crate) fn handle_scan(
    targets: &TargetArgs,
    json: bool,
    config: &Config,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let scanner = targets.build_scanner(config)?;
    let filter = targets.global_filter()?;
    let show_progress = !json && output_mode != OutputMode::Quiet;

    let results = run_scan(&scanner, filter, show_progress)?;

    if json {
        println!("{}", output::scan_json(&results)?);
    } else {
        output::print_scan_results(&results, output_mode);
    }
    Ok(())
}

/// Run `scanner` to completion on its worker thread and return the results
pub(crate) fn run_scan(
    scanner: &Scanner,
    filter: Option<ScanFilter>,
    show_progress: bool,
) -> anyhow::Result<Vec<ScanResult>> {
    if scanner.targets().is_empty() {
        bail!("No scan targets found on this system");
    }

    let total = scanner.targets().iter().filter(|t| t.enabled).count() as u64;
    let pb = if show_progress {
        progress::create_progress_bar(total, "Scanning")
    } else {
        progress::hidden()
    };

    let names: Vec<String> = scanner
        .targets()
        .iter()
        .filter(|t| t.enabled)
        .map(|t| t.name.clone())
        .collect();
    let progress_bar = pb.clone();
    let (tx, rx) = mpsc::channel();

    let started = scanner.scan(
        filter,
        move |current, _total, _percent| {
            progress_bar.set_position(current as u64);
            if let Some(name) = names.get(current) {
                progress_bar.set_message(name.clone());
            }
        },
        move |results| {
            let _ = tx.send(results);
        },
    );
    if !started {
        bail!("Could not start the scan");
    }

    let results = rx
        .recv()
        .context("Scan worker stopped without reporting results")?;
    scanner.wait();
    pb.finish_and_clear();
    Ok(results)
}
