//! Rate limiting for high-frequency progress updates.
//!
//! Analysis reports every file it visits; redrawing a spinner that often
//! costs more than the walk itself. [`Throttle`] lets one update through per
//! interval and drops the rest.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct Throttle {
    min_interval_ms: u64,
    last_emit_ms: AtomicU64,
}

impl Throttle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_emit_ms: AtomicU64::new(0),
        }
    }

    /// `true` if the caller should emit now. The first call always passes.
    pub fn ready(&self) -> bool {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        self.ready_at(now_ms)
    }

    fn ready_at(&self, now_ms: u64) -> bool {
        let last = self.last_emit_ms.load(Ordering::Relaxed);
        if last != 0 && now_ms.saturating_sub(last) < self.min_interval_ms {
            return false;
        }
        self.last_emit_ms
            .compare_exchange(last, now_ms, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }
}
