//! Background worker plumbing shared by scan, analyze and clean.
//!
//! Each orchestrator owns one [`RunFlag`] and one [`AbortHandle`]. Starting an
//! operation acquires the flag with a compare-and-swap; the returned
//! [`RunGuard`] travels into the worker thread and releases the flag when it
//! is dropped, which also covers a failed spawn and a panicking worker.
//! Workers drop it before invoking the completion callback, so a callback
//! already sees the orchestrator as idle and may start the next operation.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Idle/Running state of one orchestrator
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle -> Running. Returns `None` if an operation is already running.
    pub fn try_acquire(&self) -> Option<RunGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard(Arc::clone(&self.0)))
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Holds the run flag; dropping it returns the orchestrator to Idle
#[derive(Debug)]
pub struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Cooperative cancellation signal, cheap to clone into callbacks
#[derive(Debug, Clone, Default)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Join handle slot so callers can wait for the last operation
#[derive(Debug, Default)]
pub struct WorkerSlot(Mutex<Option<JoinHandle<()>>>);

impl WorkerSlot {
    pub fn store(&self, handle: JoinHandle<()>) {
        let mut slot = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(handle);
    }

    /// Block until the most recently started worker has finished
    pub fn join(&self) {
        let handle = self.0.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::error!("worker thread terminated by a panic");
            }
        }
    }
}

/// Tree building recurses per directory level
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Spawn a named worker thread
pub fn spawn<F>(name: &str, work: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(work)
}

/// Run `work`, turning a panic into a logged error instead of unwinding
/// through the worker. Returns `true` if `work` completed normally.
pub fn run_guarded(operation: &str, work: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(()) => true,
        Err(payload) => {
            log::error!(
                "{} worker panicked, reporting partial results: {}",
                operation,
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
