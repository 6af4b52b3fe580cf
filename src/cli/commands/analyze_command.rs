//! Analyze command feature.
//!
//! This module owns and handles the "tidyup analyze" command behavior.

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::output::{self, OutputMode};
use crate::progress;
use crate::throttle::Throttle;
use anyhow::{bail, Context};
use std::path::PathBuf;
use std::sync::mpsc;

/// Spinner text is refreshed at most this often
const PROGRESS_INTERVAL_MS: u64 = 100;

pub(crate) fn handle_analyze(
    path: Option<PathBuf>,
    top: usize,
    json: bool,
    config: &Config,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let root = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };
    if !root.exists() {
        bail!("Path does not exist: {}", root.display());
    }

    let pb = if json || output_mode == OutputMode::Quiet {
        progress::hidden()
    } else {
        progress::create_spinner(&format!("Analyzing {}", root.display()))
    };
    let spinner = pb.clone();
    let throttle = Throttle::new(PROGRESS_INTERVAL_MS);
    let (tx, rx) = mpsc::channel();

    let analyzer = Analyzer::new();
    let started = analyzer.analyze(
        &root,
        config.analyze.max_depth,
        move |current, files, dirs| {
            if throttle.ready() {
                spinner.set_message(format!(
                    "{} files, {} dirs  {}",
                    output::format_number(files),
                    output::format_number(dirs),
                    current.display()
                ));
            }
        },
        move |result| {
            let _ = tx.send(result);
        },
    );
    if !started {
        bail!("Could not start the analysis");
    }

    let result = rx
        .recv()
        .context("Analyze worker stopped without reporting results")?;
    analyzer.wait();
    pb.finish_and_clear();

    if json {
        println!("{}", output::analyze_json(&result, top)?);
    } else {
        output::print_analyze(&result, top, output_mode);
    }
    Ok(())
}
