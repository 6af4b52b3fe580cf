//! Scan orchestration: scan targets, per-target results and the background
//! scan loop.
//!
//! A [`Scanner`] holds an ordered list of [`ScanTarget`]s. [`Scanner::scan`]
//! snapshots the enabled ones and walks them one after another on a worker
//! thread, reporting progress between targets and handing every
//! [`ScanResult`] to the completion callback once the loop ends (normally,
//! by abort, or by a panic in the walk).

use crate::config::{Config, Thresholds};
use crate::filter::{FileFilter, ScanFilter, TargetRules};
use crate::paths;
use crate::size::{self, format_size};
use crate::walker::TreeWalker;
use crate::worker::{self, AbortHandle, RunFlag, WorkerSlot};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime};

/// Histogram key for files without an extension
pub const NO_EXTENSION: &str = "(no extension)";

const TEMP_PATTERNS: &[&str] = &["*.tmp", "*.temp", "~*", "*.bak", "*.old", "*.swp"];
const LOG_PATTERNS: &[&str] = &["*.log", "*.log.*", "*.trace"];
const BROWSER_EXCLUDES: &[&str] = &["*.ini", "*.dat"];

/// A named root directory plus the rules deciding which files under it are junk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanTarget {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    pub is_system: bool,
    pub enabled: bool,
    pub recursive: bool,
    pub rules: TargetRules,
}

impl ScanTarget {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: name.into(),
            description: path.display().to_string(),
            path,
            is_system: false,
            enabled: true,
            recursive: true,
            rules: TargetRules::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn add_pattern(&mut self, pattern: &str) {
        if !self.rules.patterns.iter().any(|p| p == pattern) {
            self.rules.patterns.push(pattern.to_string());
        }
    }

    pub fn add_exclude_pattern(&mut self, pattern: &str) {
        if !self.rules.exclude_patterns.iter().any(|p| p == pattern) {
            self.rules.exclude_patterns.push(pattern.to_string());
        }
    }

    pub fn set_size_filter(&mut self, min_size: u64, max_size: Option<u64>) {
        self.rules.min_size = min_size;
        self.rules.max_size = max_size;
    }

    pub fn set_age_filter(&mut self, min_age_days: Option<u32>) {
        self.rules.min_age_days = min_age_days;
    }

    pub fn set_recursive(&mut self, recursive: bool) {
        self.recursive = recursive;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
    pub file_type: String,
    pub modified: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    pub count: usize,
    pub size: u64,
}

/// Files found under one target
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub target: ScanTarget,
    pub files: Vec<ScannedFile>,
    pub file_types: BTreeMap<String, TypeStats>,
    pub total_size: u64,
    pub start_time: DateTime<Local>,
    pub end_time: Option<DateTime<Local>>,
}

impl ScanResult {
    pub fn new(target: ScanTarget) -> Self {
        Self {
            target,
            files: Vec::new(),
            file_types: BTreeMap::new(),
            total_size: 0,
            start_time: Local::now(),
            end_time: None,
        }
    }

    pub fn add_file(&mut self, path: PathBuf, size: u64, modified: SystemTime) {
        let file_type = file_type_of(&path);
        let stats = self.file_types.entry(file_type.clone()).or_default();
        stats.count += 1;
        stats.size += size;
        self.total_size += size;
        self.files.push(ScannedFile {
            path,
            size,
            file_type,
            modified: DateTime::<Local>::from(modified),
        });
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Local::now());
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Zero until the result is finished
    pub fn duration(&self) -> Duration {
        self.end_time
            .and_then(|end| (end - self.start_time).to_std().ok())
            .unwrap_or_default()
    }

    pub fn formatted_size(&self) -> String {
        format_size(self.total_size)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }
}

/// Lower-case extension without the dot, or [`NO_EXTENSION`]
pub fn file_type_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| NO_EXTENSION.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScanSummary {
    pub total_files: usize,
    pub total_size: u64,
    pub duration: Duration,
}

pub struct Scanner {
    targets: Vec<ScanTarget>,
    thresholds: Thresholds,
    target_pause: Duration,
    running: RunFlag,
    abort: AbortHandle,
    worker: WorkerSlot,
    results: Arc<Mutex<Vec<ScanResult>>>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Scanner whose preset targets and pacing follow `config`
    pub fn with_config(config: &Config) -> Self {
        Self {
            targets: Vec::new(),
            thresholds: config.thresholds.clone(),
            target_pause: Duration::from_millis(config.throttle.target_pause_ms),
            running: RunFlag::new(),
            abort: AbortHandle::new(),
            worker: WorkerSlot::default(),
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_target(&mut self, target: ScanTarget) {
        self.targets.push(target);
    }

    /// Out-of-range indices are ignored
    pub fn remove_target(&mut self, index: usize) -> Option<ScanTarget> {
        if index < self.targets.len() {
            Some(self.targets.remove(index))
        } else {
            None
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn targets(&self) -> &[ScanTarget] {
        &self.targets
    }

    /// One target per existing temp directory, the OS temp dir first.
    /// A directory nested in (or containing) one already added is skipped.
    pub fn add_temp_files_target(&mut self) -> Vec<ScanTarget> {
        let mut added: Vec<ScanTarget> = Vec::new();
        for dir in paths::temp_dirs() {
            if added
                .iter()
                .any(|t| dir.starts_with(&t.path) || t.path.starts_with(&dir))
            {
                debug!("Temp dir {} overlaps an added target", dir.display());
                continue;
            }
            let name = if added.is_empty() {
                "Temporary Files".to_string()
            } else {
                format!("Temporary Files ({})", dir.display())
            };
            let mut target = ScanTarget::new(name, dir)
                .with_description("Temporary files left behind by applications")
                .system();
            for pattern in TEMP_PATTERNS {
                target.add_pattern(pattern);
            }
            target.set_age_filter(Some(self.thresholds.temp_min_age_days));
            self.add_target(target.clone());
            added.push(target);
        }
        added
    }

    pub fn add_log_files_targets(&mut self) -> Vec<ScanTarget> {
        let mut added = Vec::new();
        for dir in paths::log_dirs() {
            let name = format!(
                "Log Files ({})",
                dir.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string())
            );
            let mut target = ScanTarget::new(name, &dir)
                .with_description(format!("Log files in {}", dir.display()))
                .system();
            for pattern in LOG_PATTERNS {
                target.add_pattern(pattern);
            }
            target.set_age_filter(Some(self.thresholds.log_min_age_days));
            self.add_target(target.clone());
            added.push(target);
        }
        added
    }

    pub fn add_browser_cache_targets(&mut self) -> Vec<ScanTarget> {
        let mut added = Vec::new();
        for (browser, dir) in paths::browser_cache_dirs() {
            let mut target = ScanTarget::new(format!("{} Cache", browser), dir)
                .with_description(format!("{} browser cache", browser));
            target.add_pattern("*");
            for pattern in BROWSER_EXCLUDES {
                target.add_exclude_pattern(pattern);
            }
            self.add_target(target.clone());
            added.push(target);
        }
        added
    }

    pub fn add_recycle_bin_target(&mut self) -> Option<ScanTarget> {
        let dir = paths::recycle_bin_dir().filter(|dir| dir.is_dir())?;
        let mut target = ScanTarget::new("Recycle Bin", dir)
            .with_description("Files already moved to the trash")
            .system();
        target.add_pattern("*");
        target.set_age_filter(Some(self.thresholds.recycle_bin_min_age_days));
        self.add_target(target.clone());
        Some(target)
    }

    /// Add a user target rooted at `path`; `None` when the path does not exist.
    /// An empty pattern list means every file. The returned reference is the
    /// stored target, for settings beyond the ones taken here.
    pub fn add_custom_target(
        &mut self,
        name: &str,
        path: &Path,
        patterns: &[String],
        min_age_days: Option<u32>,
        min_size: u64,
        description: Option<&str>,
    ) -> Option<&mut ScanTarget> {
        let path = paths::normalize_path(path);
        if !path.exists() {
            warn!("Custom target '{}' skipped: {} does not exist", name, path.display());
            return None;
        }

        let mut target = ScanTarget::new(name, path);
        if let Some(description) = description {
            target.description = description.to_string();
        }
        if patterns.is_empty() {
            target.add_pattern("*");
        }
        for pattern in patterns {
            target.add_pattern(pattern);
        }
        target.set_age_filter(min_age_days);
        target.set_size_filter(min_size, None);
        self.add_target(target);
        self.targets.last_mut()
    }

    /// Temp files, logs, browser caches and the recycle bin
    pub fn add_common_targets(&mut self) -> Vec<ScanTarget> {
        let mut added = Vec::new();
        added.extend(self.add_temp_files_target());
        added.extend(self.add_log_files_targets());
        added.extend(self.add_browser_cache_targets());
        added.extend(self.add_recycle_bin_target());
        added
    }

    /// Add the `[[targets]]` entries of `config` whose paths exist
    pub fn add_configured_targets(&mut self, config: &Config) -> Result<Vec<ScanTarget>> {
        let mut added = Vec::new();
        for entry in &config.targets {
            let min_size = match &entry.min_size {
                Some(s) => size::parse_size(s)
                    .with_context(|| format!("Invalid min_size for target '{}'", entry.name))?,
                None => 0,
            };
            let max_size = match &entry.max_size {
                Some(s) => Some(
                    size::parse_size(s)
                        .with_context(|| format!("Invalid max_size for target '{}'", entry.name))?,
                ),
                None => None,
            };

            let Some(target) = self.add_custom_target(
                &entry.name,
                Path::new(&entry.path),
                &entry.patterns,
                entry.min_age_days,
                min_size,
                entry.description.as_deref(),
            ) else {
                continue;
            };

            for pattern in &entry.exclude_patterns {
                target.add_exclude_pattern(pattern);
            }
            target.set_size_filter(min_size, max_size);
            target.set_recursive(entry.recursive);
            target.set_enabled(entry.enabled);
            added.push(target.clone());
        }
        Ok(added)
    }

    /// Start a background scan of the enabled targets.
    ///
    /// Returns `false` without calling anything if a scan is already running
    /// or the worker thread cannot be started.
    pub fn scan<P, C>(&self, filter: Option<ScanFilter>, on_progress: P, on_complete: C) -> bool
    where
        P: FnMut(usize, usize, u8) + Send + 'static,
        C: FnOnce(Vec<ScanResult>) + Send + 'static,
    {
        let Some(guard) = self.running.try_acquire() else {
            warn!("A scan is already in progress");
            return false;
        };
        self.abort.reset();

        let targets: Vec<ScanTarget> = self.targets.iter().filter(|t| t.enabled).cloned().collect();
        let abort = self.abort.clone();
        let store = Arc::clone(&self.results);
        let pause = self.target_pause;
        let mut on_progress = on_progress;

        let spawned = worker::spawn("tidyup-scan", move || {
            let mut results = Vec::with_capacity(targets.len());
            worker::run_guarded("scan", || {
                scan_targets(&targets, filter.as_ref(), pause, &abort, &mut on_progress, &mut results)
            });
            *store.lock().unwrap_or_else(|e| e.into_inner()) = results.clone();
            // Idle before completion so the callback can start the next scan
            drop(guard);
            on_complete(results);
        });

        match spawned {
            Ok(handle) => {
                self.worker.store(handle);
                true
            }
            Err(e) => {
                error!("Failed to start scan worker: {}", e);
                false
            }
        }
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Block until the last started scan has delivered its results
    pub fn wait(&self) {
        self.worker.join();
    }

    /// Results of the last completed scan
    pub fn results(&self) -> Vec<ScanResult> {
        self.results.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn results_summary(&self) -> ScanSummary {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.iter().fold(ScanSummary::default(), |mut acc, r| {
            acc.total_files += r.file_count();
            acc.total_size += r.total_size;
            acc.duration += r.duration();
            acc
        })
    }

    /// Per-type histogram merged over all targets of the last scan
    pub fn file_types_summary(&self) -> BTreeMap<String, TypeStats> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        let mut merged: BTreeMap<String, TypeStats> = BTreeMap::new();
        for result in results.iter() {
            for (file_type, stats) in &result.file_types {
                let entry = merged.entry(file_type.clone()).or_default();
                entry.count += stats.count;
                entry.size += stats.size;
            }
        }
        merged
    }
}

fn scan_targets(
    targets: &[ScanTarget],
    global: Option<&ScanFilter>,
    pause: Duration,
    abort: &AbortHandle,
    on_progress: &mut dyn FnMut(usize, usize, u8),
    results: &mut Vec<ScanResult>,
) {
    let total = targets.len();
    let walker = TreeWalker::new(abort);

    for (i, target) in targets.iter().enumerate() {
        if abort.is_aborted() {
            info!("Scan aborted after {} of {} targets", i, total);
            break;
        }
        on_progress(i, total, size::round_percent(i, total));

        let mut result = ScanResult::new(target.clone());
        match FileFilter::new(&target.rules, global) {
            Ok(filter) => {
                debug!("Scanning {} ({})", target.name, target.path.display());
                walker.collect_matches(&target.path, target.recursive, &filter, &mut result);
            }
            Err(e) => warn!("Skipping target '{}': {:#}", target.name, e),
        }
        result.finish();
        debug!(
            "{}: {} files, {}",
            target.name,
            result.file_count(),
            result.formatted_size()
        );
        results.push(result);

        on_progress(i + 1, total, size::round_percent(i + 1, total));

        if i + 1 < total && !abort.is_aborted() && !pause.is_zero() {
            thread::sleep(pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn quick_scanner() -> Scanner {
        let mut config = Config::default();
        config.throttle.target_pause_ms = 0;
        Scanner::with_config(&config)
    }

    #[test]
    fn test_target_patterns_are_deduplicated() {
        let mut target = ScanTarget::new("t", "/tmp");
        target.add_pattern("*.log");
        target.add_pattern("*.log");
        target.add_exclude_pattern("keep.log");
        target.add_exclude_pattern("keep.log");
        assert_eq!(target.rules.patterns, vec!["*.log"]);
        assert_eq!(target.rules.exclude_patterns, vec!["keep.log"]);
        assert_eq!(target.description, "/tmp");
        assert!(target.recursive);
    }

    #[test]
    fn test_scan_result_histogram() {
        let mut result = ScanResult::new(ScanTarget::new("t", "/x"));
        let now = SystemTime::now();
        result.add_file(PathBuf::from("/x/a.LOG"), 10, now);
        result.add_file(PathBuf::from("/x/b.log"), 5, now);
        result.add_file(PathBuf::from("/x/README"), 1, now);

        assert_eq!(result.total_size, 16);
        assert_eq!(result.file_types["log"], TypeStats { count: 2, size: 15 });
        assert_eq!(result.file_types[NO_EXTENSION], TypeStats { count: 1, size: 1 });
        assert_eq!(result.duration(), Duration::ZERO);
    }

    #[test]
    fn test_remove_target_out_of_range() {
        let mut scanner = quick_scanner();
        scanner.add_target(ScanTarget::new("a", "/a"));
        assert!(scanner.remove_target(3).is_none());
        assert_eq!(scanner.targets().len(), 1);
        assert!(scanner.remove_target(0).is_some());
        assert!(scanner.targets().is_empty());
    }

    #[test]
    fn test_custom_target_requires_existing_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner = quick_scanner();
        assert!(scanner
            .add_custom_target("gone", &temp_dir.path().join("missing"), &[], None, 0, None)
            .is_none());

        let added = scanner
            .add_custom_target("here", temp_dir.path(), &[], Some(3), 0, Some("scratch"))
            .unwrap();
        assert_eq!(added.rules.patterns, vec!["*"]);
        assert_eq!(added.rules.min_age_days, Some(3));
        assert_eq!(added.description, "scratch");
        added.add_exclude_pattern("keep.me");
        added.set_recursive(false);

        assert_eq!(scanner.targets().len(), 1);
        assert_eq!(scanner.targets()[0].rules.exclude_patterns, vec!["keep.me"]);
        assert!(!scanner.targets()[0].recursive);
    }

    #[test]
    fn test_temp_target_uses_thresholds() {
        let mut config = Config::default();
        config.thresholds.temp_min_age_days = 4;
        let mut scanner = Scanner::with_config(&config);
        let added = scanner.add_temp_files_target();
        assert!(!added.is_empty());
        assert!(added.len() <= paths::temp_dirs().len());
        let target = &added[0];
        assert_eq!(target.name, "Temporary Files");
        assert_eq!(target.path, paths::temp_dirs()[0]);
        assert_eq!(target.rules.min_age_days, Some(4));
        assert!(target.is_system);
        assert!(target.rules.patterns.iter().any(|p| p == "~*"));
        assert!(added.iter().all(|t| t.rules.min_age_days == Some(4)));
        assert_eq!(scanner.targets().len(), added.len());
    }

    #[test]
    fn test_configured_targets() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.targets.push(crate::config::TargetConfig {
            name: "Scratch".to_string(),
            path: temp_dir.path().display().to_string(),
            description: None,
            patterns: vec!["*.part".to_string()],
            exclude_patterns: vec!["keep.part".to_string()],
            min_age_days: None,
            min_size: Some("1KB".to_string()),
            max_size: Some("1MB".to_string()),
            recursive: false,
            enabled: true,
        });

        let mut scanner = quick_scanner();
        let added = scanner.add_configured_targets(&config).unwrap();
        assert_eq!(added.len(), 1);
        let target = &scanner.targets()[0];
        assert_eq!(target.rules.min_size, 1024);
        assert_eq!(target.rules.max_size, Some(1024 * 1024));
        assert_eq!(target.rules.exclude_patterns, vec!["keep.part"]);
        assert!(!target.recursive);
    }

    #[test]
    fn test_scan_reports_progress_and_results() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("one.tmp"), b"12345").unwrap();
        fs::write(temp_dir.path().join("two.txt"), b"123").unwrap();

        let mut scanner = quick_scanner();
        let mut target = ScanTarget::new("tmp", temp_dir.path());
        target.add_pattern("*.tmp");
        scanner.add_target(target);
        let mut disabled = ScanTarget::new("off", temp_dir.path());
        disabled.set_enabled(false);
        scanner.add_target(disabled);

        let (progress_tx, progress_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        assert!(scanner.scan(
            None,
            move |current, total, percent| {
                progress_tx.send((current, total, percent)).unwrap();
            },
            move |results| {
                done_tx.send(results).unwrap();
            },
        ));

        let results = done_rx.recv().unwrap();
        scanner.wait();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_count(), 1);
        assert_eq!(results[0].total_size, 5);
        assert!(results[0].end_time.is_some());

        let progress: Vec<_> = progress_rx.iter().collect();
        assert_eq!(progress, vec![(0, 1, 0), (1, 1, 100)]);

        assert!(!scanner.is_running());
        assert_eq!(scanner.results_summary().total_files, 1);
        assert_eq!(scanner.file_types_summary()["tmp"].count, 1);
    }

    #[test]
    fn test_second_scan_rejected_while_running() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner = quick_scanner();
        scanner.add_target(ScanTarget::new("a", temp_dir.path()));

        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (started_tx, started_rx) = mpsc::channel();
        assert!(scanner.scan(
            None,
            move |current, _, _| {
                if current == 0 {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                }
            },
            |_| {},
        ));

        started_rx.recv().unwrap();
        assert!(scanner.is_running());
        assert!(!scanner.scan(None, |_, _, _| {}, |_| {}));

        release_tx.send(()).unwrap();
        scanner.wait();
        assert!(!scanner.is_running());
        assert!(scanner.scan(None, |_, _, _| {}, |_| {}));
        scanner.wait();
    }

    #[test]
    fn test_scanner_idle_inside_completion() {
        let temp_dir = TempDir::new().unwrap();
        let mut scanner = quick_scanner();
        scanner.add_target(ScanTarget::new("a", temp_dir.path()));
        let scanner = Arc::new(scanner);

        let (state_tx, state_rx) = mpsc::channel();
        let (restart_tx, restart_rx) = mpsc::channel();
        let inner = Arc::clone(&scanner);
        assert!(scanner.scan(None, |_, _, _| {}, move |_| {
            let running = inner.is_running();
            let restarted = inner.scan(None, |_, _, _| {}, move |results| {
                restart_tx.send(results.len()).unwrap();
            });
            state_tx.send((running, restarted)).unwrap();
        }));

        assert_eq!(state_rx.recv().unwrap(), (false, true));
        assert_eq!(restart_rx.recv().unwrap(), 1);
        scanner.wait();
        assert!(!scanner.is_running());
    }

    #[test]
    fn test_panicking_progress_callback_still_completes_once() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.tmp"), b"abc").unwrap();
        let mut scanner = quick_scanner();
        for name in ["first", "second"] {
            let mut target = ScanTarget::new(name, temp_dir.path());
            target.add_pattern("*.tmp");
            scanner.add_target(target);
        }

        let (done_tx, done_rx) = mpsc::channel();
        let mut calls = 0;
        assert!(scanner.scan(
            None,
            move |_, _, _| {
                calls += 1;
                if calls == 2 {
                    panic!("progress sink failed");
                }
            },
            move |results| done_tx.send(results).unwrap(),
        ));

        let results = done_rx.recv().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].target.name, "first");
        assert_eq!(results[0].file_count(), 1);
        assert!(done_rx.recv().is_err());

        scanner.wait();
        assert!(!scanner.is_running());
        assert_eq!(scanner.results().len(), 1);
    }

    #[test]
    fn test_scan_of_no_targets_completes() {
        let scanner = quick_scanner();
        let (done_tx, done_rx) = mpsc::channel();
        assert!(scanner.scan(None, |_, _, _| {}, move |results| {
            done_tx.send(results.len()).unwrap();
        }));
        assert_eq!(done_rx.recv().unwrap(), 0);
        scanner.wait();
    }
}
