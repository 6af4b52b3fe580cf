//! Clean command feature.
//!
//! This module owns and handles the "tidyup clean" command behavior.

use super::scan_command::run_scan;
use crate::cleaner::{CleanResult, CleanTask, Cleaner};
use crate::cli::TargetArgs;
use crate::config::Config;
use crate::output::{self, OutputMode};
use crate::progress;
use crate::size::format_size;
use crate::theme::Theme;
use anyhow::{bail, Context};
use std::io::{self, BufRead, Write};
use std::sync::mpsc;

/// Read one line from stdin after flushing the prompt.
///
/// A fresh stdin handle is taken each time; on Windows a handle kept across
/// terminal focus changes can return stale input.
fn read_line_from_stdin() -> io::Result<String> {
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input)
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub(crate) fn handle_clean(
    targets: &TargetArgs,
    yes: bool,
    dry_run: bool,
    config: &Config,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let scanner = targets.build_scanner(config)?;
    let filter = targets.global_filter()?;
    let show_progress = output_mode != OutputMode::Quiet;

    let results = run_scan(&scanner, filter, show_progress)?;
    let tasks: Vec<CleanTask> = results
        .iter()
        .flat_map(|r| r.files.iter().map(|f| CleanTask::from_scanned(f, &r.target.name)))
        .collect();

    if tasks.is_empty() {
        if output_mode != OutputMode::Quiet {
            println!("{}", Theme::success("Nothing to clean"));
        }
        return Ok(());
    }

    let total_size: u64 = tasks.iter().map(|t| t.size).sum();
    let method = config.clean.method;

    if dry_run {
        output::print_scan_results(&results, output_mode);
        println!(
            "{}",
            Theme::muted(&format!(
                "Dry run: {} files ({}) would be cleaned with method '{}'",
                tasks.len(),
                format_size(total_size),
                method
            ))
        );
        return Ok(());
    }

    if !yes {
        output::print_scan_results(&results, output_mode);
        print!(
            "Clean {} files ({}) using method '{}'? [y/N]: ",
            tasks.len(),
            format_size(total_size),
            method
        );
        let answer = read_line_from_stdin().context("Failed to read confirmation")?;
        if !is_yes(&answer) {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let cleaner = Cleaner::with_config(config);
    let clean_results = run_clean(&cleaner, tasks, show_progress)?;
    output::print_clean_results(&clean_results, output_mode);
    Ok(())
}

fn run_clean(
    cleaner: &Cleaner,
    tasks: Vec<CleanTask>,
    show_progress: bool,
) -> anyhow::Result<Vec<CleanResult>> {
    let pb = if show_progress {
        progress::create_progress_bar(tasks.len() as u64, "Cleaning")
    } else {
        progress::hidden()
    };
    let progress_bar = pb.clone();
    let (tx, rx) = mpsc::channel();

    let started = cleaner.clean(
        tasks,
        None,
        move |current, _total, _percent| progress_bar.set_position(current as u64),
        move |results| {
            let _ = tx.send(results);
        },
    );
    if !started {
        bail!("Could not start cleaning");
    }

    let results = rx
        .recv()
        .context("Clean worker stopped without reporting results")?;
    cleaner.wait();
    pb.finish_and_clear();
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES \r\n"));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
