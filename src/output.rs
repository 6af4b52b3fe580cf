use crate::analyzer::{AnalyzeResult, SizeShare};
use crate::cleaner::{CleanResult, CleanSummary};
use crate::disk_usage::DiskInfo;
use crate::scanner::{ScanResult, TypeStats};
use crate::size::{format_percentage, format_size};
use crate::theme::Theme;
use serde::Serialize;
use std::collections::BTreeMap;

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,       // Only errors
    Normal,      // Standard output
    Verbose,     // More details
    VeryVerbose, // All details including file paths
}

impl OutputMode {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            OutputMode::Quiet
        } else {
            match verbose {
                0 => OutputMode::Normal,
                1 => OutputMode::Verbose,
                _ => OutputMode::VeryVerbose,
            }
        }
    }
}

/// Group digits in thousands: 1234567 -> "1,234,567"
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

pub fn print_scan_results(results: &[ScanResult], mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    println!("{}", Theme::header("Scan results"));
    for result in results {
        println!(
            "{:<32} {:>10} files {:>12}",
            result.target.name,
            format_number(result.file_count() as u64),
            result.formatted_size()
        );
        if mode != OutputMode::Normal {
            println!("{}", Theme::muted(&result.target.path.display().to_string()));
            for (file_type, stats) in &result.file_types {
                println!(
                    "    {:<20} {:>8} {:>12}",
                    file_type,
                    format_number(stats.count as u64),
                    format_size(stats.size)
                );
            }
        }
        if mode == OutputMode::VeryVerbose {
            for file in &result.files {
                println!("      {} ({})", file.path.display(), format_size(file.size));
            }
        }
    }

    let files: usize = results.iter().map(|r| r.file_count()).sum();
    let size: u64 = results.iter().map(|r| r.total_size).sum();
    println!("{}", Theme::divider(60));
    println!(
        "{}",
        Theme::row(
            "Total",
            &format!("{} files, {}", format_number(files as u64), format_size(size))
        )
    );
}

#[derive(Serialize)]
struct JsonScan<'a> {
    version: &'static str,
    timestamp: String,
    targets: Vec<JsonTarget<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonTarget<'a> {
    name: &'a str,
    path: String,
    files: usize,
    size_bytes: u64,
    size_human: String,
    file_types: &'a BTreeMap<String, TypeStats>,
    paths: Vec<String>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_files: usize,
    total_bytes: u64,
    total_human: String,
}

pub fn scan_json(results: &[ScanResult]) -> anyhow::Result<String> {
    let targets: Vec<JsonTarget> = results
        .iter()
        .map(|r| JsonTarget {
            name: &r.target.name,
            path: r.target.path.display().to_string(),
            files: r.file_count(),
            size_bytes: r.total_size,
            size_human: r.formatted_size(),
            file_types: &r.file_types,
            paths: r.paths().map(|p| p.display().to_string()).collect(),
        })
        .collect();
    let total_files = results.iter().map(|r| r.file_count()).sum();
    let total_bytes = results.iter().map(|r| r.total_size).sum();

    let output = JsonScan {
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Local::now().to_rfc3339(),
        targets,
        summary: JsonSummary {
            total_files,
            total_bytes,
            total_human: format_size(total_bytes),
        },
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn print_clean_results(results: &[CleanResult], mode: OutputMode) {
    let summary = CleanSummary::from_results(results);

    for result in results.iter().filter(|r| !r.success) {
        eprintln!(
            "{}",
            Theme::error(&format!(
                "{}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            ))
        );
    }

    if mode == OutputMode::Quiet {
        return;
    }
    if mode == OutputMode::VeryVerbose {
        for result in results.iter().filter(|r| r.success) {
            println!("{}", Theme::muted(&result.path.display().to_string()));
        }
    }
    println!(
        "{}",
        Theme::success(&format!(
            "Cleaned {} items, freed {}",
            format_number(summary.succeeded as u64),
            format_size(summary.bytes_freed)
        ))
    );
    if summary.failed > 0 {
        println!(
            "{}",
            Theme::warning(&format!("{} items could not be cleaned", summary.failed))
        );
    }
}

fn print_shares(title: &str, rows: &[SizeShare], top: usize) {
    println!();
    println!("{}", Theme::header(title));
    for row in rows.iter().take(top) {
        println!(
            "  {:>12} {:>7}%  {}",
            format_size(row.size),
            format!("{:.1}", row.percent),
            row.label
        );
    }
}

pub fn print_analyze(result: &AnalyzeResult, top: usize, mode: OutputMode) {
    if mode == OutputMode::Quiet {
        return;
    }

    let Some(tree) = &result.tree else {
        println!("{}", Theme::warning("Nothing to analyze"));
        return;
    };

    let root = tree.get(tree.root());
    println!("{}", Theme::header(&format!("Disk usage of {}", root.path.display())));
    println!("{}", Theme::row("Total size", &format_size(result.total_size)));
    println!("{}", Theme::row("Files", &format_number(result.file_count)));
    println!("{}", Theme::row("Directories", &format_number(result.dir_count)));

    if root.is_dir {
        println!();
        for id in tree.children_by_size(tree.root()).into_iter().take(top) {
            let item = tree.get(id);
            let marker = if item.is_dir { "/" } else { "" };
            println!(
                "  {:>12} {:>6}  {}{}",
                format_size(item.size),
                format_percentage(item.size, root.size, 1),
                item.name,
                marker
            );
        }
    }

    print_shares("File types", &result.file_types_summary(), top);
    print_shares("Largest files", &result.largest_files_summary(), top);
    if mode != OutputMode::Normal {
        print_shares("Largest directories", &result.largest_dirs_summary(), top);
    }
}

#[derive(Serialize)]
struct JsonAnalyze {
    root: Option<String>,
    total_size: u64,
    total_human: String,
    file_count: u64,
    dir_count: u64,
    file_types: Vec<SizeShare>,
    largest_files: Vec<SizeShare>,
    largest_dirs: Vec<SizeShare>,
}

pub fn analyze_json(result: &AnalyzeResult, top: usize) -> anyhow::Result<String> {
    let take = |rows: Vec<SizeShare>| rows.into_iter().take(top).collect::<Vec<_>>();
    let output = JsonAnalyze {
        root: result
            .tree
            .as_ref()
            .map(|t| t.get(t.root()).path.display().to_string()),
        total_size: result.total_size,
        total_human: format_size(result.total_size),
        file_count: result.file_count,
        dir_count: result.dir_count,
        file_types: take(result.file_types_summary()),
        largest_files: take(result.largest_files_summary()),
        largest_dirs: take(result.largest_dirs_summary()),
    };
    Ok(serde_json::to_string_pretty(&output)?)
}

pub fn print_disks(disks: &[DiskInfo]) {
    println!(
        "{:<24} {:<10} {:>12} {:>12} {:>12} {:>7}",
        "Mount", "FS", "Total", "Used", "Free", "Use%"
    );
    println!("{}", Theme::divider(82));
    for disk in disks {
        println!(
            "{:<24} {:<10} {:>12} {:>12} {:>12} {:>6.1}%",
            disk.mount_point.display(),
            disk.file_system,
            format_size(disk.usage.total),
            format_size(disk.usage.used),
            format_size(disk.usage.free),
            disk.usage.percent
        );
    }
}

pub fn disks_json(disks: &[DiskInfo]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(disks)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanTarget;
    use std::path::PathBuf;
    use std::time::SystemTime;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_output_mode_from_flags() {
        assert_eq!(OutputMode::from_flags(true, 3), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(false, 0), OutputMode::Normal);
        assert_eq!(OutputMode::from_flags(false, 1), OutputMode::Verbose);
        assert_eq!(OutputMode::from_flags(false, 2), OutputMode::VeryVerbose);
    }

    #[test]
    fn test_scan_json_shape() {
        let mut result = ScanResult::new(ScanTarget::new("Temp", "/tmp"));
        result.add_file(PathBuf::from("/tmp/a.tmp"), 2048, SystemTime::now());

        let json = scan_json(&[result]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["total_files"], 1);
        assert_eq!(value["summary"]["total_bytes"], 2048);
        assert_eq!(value["targets"][0]["name"], "Temp");
        assert_eq!(value["targets"][0]["size_human"], "2 KB");
        assert_eq!(value["targets"][0]["file_types"]["tmp"]["count"], 1);
    }

    #[test]
    fn test_analyze_json_limits_rows() {
        let mut result = AnalyzeResult::default();
        for i in 0..5u64 {
            result.record_file(&PathBuf::from(format!("/f{}.bin", i)), i + 1);
        }
        let json = analyze_json(&result, 2).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["largest_files"].as_array().unwrap().len(), 2);
        assert_eq!(value["largest_files"][0]["size"], 5);
        assert!(value["root"].is_null());
    }
}
