//! Clean execution: deletes, trashes, renames or shreds a list of paths on a
//! worker thread, one [`CleanResult`] per task.
//!
//! Every task is isolated. A failure is recorded in its result and the batch
//! moves on to the next task.

mod path_precheck;
mod secure_delete;
mod single_deletion;

use crate::config::Config;
use crate::scanner::ScannedFile;
use crate::size;
use crate::walker;
use crate::worker::{self, AbortHandle, RunFlag, WorkerSlot};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CleanMethod {
    /// Move to the OS trash / recycle bin
    #[default]
    Trash,
    /// Delete immediately
    Permanent,
    /// Rename to a `.bak` backup next to the original
    Rename,
    /// Overwrite three times, then delete
    Secure,
}

impl CleanMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanMethod::Trash => "trash",
            CleanMethod::Permanent => "permanent",
            CleanMethod::Rename => "rename",
            CleanMethod::Secure => "secure",
        }
    }
}

impl fmt::Display for CleanMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path to clean plus the size it had when the task was created
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanTask {
    pub path: PathBuf,
    pub size: u64,
    pub metadata: BTreeMap<String, String>,
}

impl CleanTask {
    /// Directories are measured recursively; unreadable paths count as 0
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let size = walker::dir_size(&path);
        Self {
            path,
            size,
            metadata: BTreeMap::new(),
        }
    }

    pub fn from_scanned(file: &ScannedFile, target: &str) -> Self {
        Self {
            path: file.path.clone(),
            size: file.size,
            metadata: BTreeMap::new(),
        }
        .with_metadata("target", target)
        .with_metadata("type", &file.file_type)
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanResult {
    pub path: PathBuf,
    pub success: bool,
    pub error: Option<String>,
    pub size: u64,
    pub metadata: BTreeMap<String, String>,
    pub timestamp: DateTime<Local>,
}

impl CleanResult {
    fn from_task(task: CleanTask, outcome: Result<(), String>) -> Self {
        Self {
            path: task.path,
            success: outcome.is_ok(),
            error: outcome.err(),
            size: task.size,
            metadata: task.metadata,
            timestamp: Local::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub bytes_freed: u64,
}

impl CleanSummary {
    pub fn from_results(results: &[CleanResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            if r.success {
                acc.succeeded += 1;
                acc.bytes_freed += r.size;
            } else {
                acc.failed += 1;
            }
            acc
        })
    }
}

pub struct Cleaner {
    method: CleanMethod,
    task_pause: Duration,
    running: RunFlag,
    abort: AbortHandle,
    worker: WorkerSlot,
}

impl Cleaner {
    pub fn new(method: CleanMethod) -> Self {
        Self {
            method,
            task_pause: Duration::from_millis(Config::default().throttle.task_pause_ms),
            running: RunFlag::new(),
            abort: AbortHandle::new(),
            worker: WorkerSlot::default(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut cleaner = Self::new(config.clean.method);
        cleaner.task_pause = Duration::from_millis(config.throttle.task_pause_ms);
        cleaner
    }

    pub fn set_method(&mut self, method: CleanMethod) {
        self.method = method;
    }

    pub fn method(&self) -> CleanMethod {
        self.method
    }

    /// Start cleaning `tasks` in order on a worker thread.
    ///
    /// `method` overrides the default method for this batch. Returns `false`
    /// if a clean is already running or the worker cannot be started.
    pub fn clean<P, C>(
        &self,
        tasks: Vec<CleanTask>,
        method: Option<CleanMethod>,
        on_progress: P,
        on_complete: C,
    ) -> bool
    where
        P: FnMut(usize, usize, u8) + Send + 'static,
        C: FnOnce(Vec<CleanResult>) + Send + 'static,
    {
        let Some(guard) = self.running.try_acquire() else {
            warn!("A clean is already in progress");
            return false;
        };
        self.abort.reset();

        let method = method.unwrap_or(self.method);
        let abort = self.abort.clone();
        let pause = self.task_pause;
        let mut on_progress = on_progress;

        let spawned = worker::spawn("tidyup-clean", move || {
            let mut results = Vec::with_capacity(tasks.len());
            worker::run_guarded("clean", || {
                clean_tasks(tasks, method, pause, &abort, &mut on_progress, &mut results)
            });
            drop(guard);
            on_complete(results);
        });

        match spawned {
            Ok(handle) => {
                self.worker.store(handle);
                true
            }
            Err(e) => {
                error!("Failed to start clean worker: {}", e);
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

    pub fn wait(&self) {
        self.worker.join();
    }
}

fn clean_tasks(
    tasks: Vec<CleanTask>,
    method: CleanMethod,
    pause: Duration,
    abort: &AbortHandle,
    on_progress: &mut dyn FnMut(usize, usize, u8),
    results: &mut Vec<CleanResult>,
) {
    let total = tasks.len();
    info!("Cleaning {} paths with method {}", total, method);

    for (i, task) in tasks.into_iter().enumerate() {
        if abort.is_aborted() {
            info!("Clean aborted after {} of {} paths", i, total);
            break;
        }

        let outcome = clean_one(&task.path, method);
        match &outcome {
            Ok(()) => debug!("Cleaned {}", task.path.display()),
            Err(msg) => warn!("Failed to clean {}: {}", task.path.display(), msg),
        }
        results.push(CleanResult::from_task(task, outcome));

        on_progress(i + 1, total, size::round_percent(i + 1, total));

        if i + 1 < total && !pause.is_zero() {
            thread::sleep(pause);
        }
    }
}

fn clean_one(path: &Path, method: CleanMethod) -> Result<(), String> {
    single_deletion::clean_path(path, method).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{mpsc, Arc};
    use tempfile::TempDir;

    fn quick_cleaner(method: CleanMethod) -> Cleaner {
        let mut config = Config::default();
        config.clean.method = method;
        config.throttle.task_pause_ms = 0;
        Cleaner::with_config(&config)
    }

    fn run(cleaner: &Cleaner, tasks: Vec<CleanTask>) -> (Vec<CleanResult>, Vec<(usize, usize, u8)>) {
        let (progress_tx, progress_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        assert!(cleaner.clean(
            tasks,
            None,
            move |i, total, pct| progress_tx.send((i, total, pct)).unwrap(),
            move |results| done_tx.send(results).unwrap(),
        ));
        let results = done_rx.recv().unwrap();
        cleaner.wait();
        (results, progress_rx.iter().collect())
    }

    #[test]
    fn test_clean_method_parsing_and_display() {
        use clap::ValueEnum;
        assert_eq!(CleanMethod::from_str("secure", true).unwrap(), CleanMethod::Secure);
        assert_eq!(CleanMethod::Rename.to_string(), "rename");
        assert_eq!(CleanMethod::default(), CleanMethod::Trash);
    }

    #[test]
    fn test_task_size_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("d");
        fs::create_dir_all(dir.join("e")).unwrap();
        fs::write(dir.join("a"), vec![0u8; 10]).unwrap();
        fs::write(dir.join("e/b"), vec![0u8; 15]).unwrap();

        assert_eq!(CleanTask::new(&dir).size, 25);
        assert_eq!(CleanTask::new(dir.join("a")).size, 10);
        assert_eq!(CleanTask::new(temp_dir.path().join("missing")).size, 0);
    }

    #[test]
    fn test_permanent_clean_with_progress() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.tmp");
        let b = temp_dir.path().join("b.tmp");
        fs::write(&a, "aaaa").unwrap();
        fs::write(&b, "bb").unwrap();

        let cleaner = quick_cleaner(CleanMethod::Permanent);
        let tasks = vec![
            CleanTask::new(&a).with_metadata("target", "test"),
            CleanTask::new(&b),
        ];
        let (results, progress) = run(&cleaner, tasks);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.success && r.error.is_none()));
        assert_eq!(results[0].size, 4);
        assert_eq!(results[0].metadata["target"], "test");
        assert!(!a.exists() && !b.exists());
        assert_eq!(progress, vec![(1, 2, 50), (2, 2, 100)]);

        let summary = CleanSummary::from_results(&results);
        assert_eq!(summary, CleanSummary { succeeded: 2, failed: 0, bytes_freed: 6 });
    }

    #[test]
    fn test_missing_file_fails_without_stopping_batch() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.log");
        fs::write(&present, "x").unwrap();

        let cleaner = quick_cleaner(CleanMethod::Permanent);
        let tasks = vec![
            CleanTask::new(temp_dir.path().join("gone.log")),
            CleanTask::new(&present),
        ];
        let (results, _) = run(&cleaner, tasks);

        assert!(!results[0].success);
        assert_eq!(results[0].error.as_deref(), Some("file not found"));
        assert!(results[1].success);
    }

    #[test]
    fn test_empty_batch_completes() {
        let cleaner = quick_cleaner(CleanMethod::Permanent);
        let (results, progress) = run(&cleaner, Vec::new());
        assert!(results.is_empty());
        assert!(progress.is_empty());
        assert!(!cleaner.is_running());
    }

    #[test]
    fn test_abort_omits_remaining_tasks() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| {
                let p = temp_dir.path().join(format!("f{}.tmp", i));
                fs::write(&p, "x").unwrap();
                p
            })
            .collect();

        let cleaner = quick_cleaner(CleanMethod::Permanent);
        let handle = cleaner.abort_handle();
        let (done_tx, done_rx) = mpsc::channel();
        assert!(cleaner.clean(
            paths.iter().map(CleanTask::new).collect(),
            None,
            move |i, _, _| {
                if i == 1 {
                    handle.abort();
                }
            },
            move |results| done_tx.send(results).unwrap(),
        ));

        let results = done_rx.recv().unwrap();
        cleaner.wait();
        assert_eq!(results.len(), 1);
        assert!(!paths[0].exists());
        assert!(paths[3].exists());
    }

    #[test]
    fn test_cleaner_idle_inside_completion() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.tmp");
        let second = temp_dir.path().join("second.tmp");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let cleaner = Arc::new(quick_cleaner(CleanMethod::Permanent));
        let inner = Arc::clone(&cleaner);
        let (state_tx, state_rx) = mpsc::channel();
        let (restart_tx, restart_rx) = mpsc::channel();
        let next = vec![CleanTask::new(&second)];
        assert!(cleaner.clean(
            vec![CleanTask::new(&first)],
            None,
            |_, _, _| {},
            move |_| {
                let running = inner.is_running();
                let restarted = inner.clean(next, None, |_, _, _| {}, move |results| {
                    restart_tx.send(results).unwrap();
                });
                state_tx.send((running, restarted)).unwrap();
            },
        ));

        assert_eq!(state_rx.recv().unwrap(), (false, true));
        let results = restart_rx.recv().unwrap();
        assert!(results[0].success);
        cleaner.wait();
        assert!(!first.exists());
        assert!(!second.exists());
        assert!(!cleaner.is_running());
    }

    #[test]
    fn test_panicking_progress_callback_still_completes_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths: Vec<PathBuf> = (0..3)
            .map(|i| {
                let p = temp_dir.path().join(format!("f{}.tmp", i));
                fs::write(&p, "x").unwrap();
                p
            })
            .collect();

        let cleaner = quick_cleaner(CleanMethod::Permanent);
        let (done_tx, done_rx) = mpsc::channel();
        assert!(cleaner.clean(
            paths.iter().map(CleanTask::new).collect(),
            None,
            |_, _, _| panic!("progress sink failed"),
            move |results| done_tx.send(results).unwrap(),
        ));

        let results = done_rx.recv().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert!(done_rx.recv().is_err());

        cleaner.wait();
        assert!(!cleaner.is_running());
        assert!(!paths[0].exists());
        assert!(paths[1].exists());
    }

    #[test]
    fn test_method_override() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("keep.txt");
        fs::write(&file, "data").unwrap();

        let mut cleaner = quick_cleaner(CleanMethod::Permanent);
        cleaner.set_method(CleanMethod::Secure);
        assert_eq!(cleaner.method(), CleanMethod::Secure);

        let (done_tx, done_rx) = mpsc::channel();
        assert!(cleaner.clean(
            vec![CleanTask::new(&file)],
            Some(CleanMethod::Rename),
            |_, _, _| {},
            move |results| done_tx.send(results).unwrap(),
        ));
        let results = done_rx.recv().unwrap();
        cleaner.wait();
        assert!(results[0].success);
        assert!(temp_dir.path().join("keep.txt.bak").exists());
    }
}
