//! Thin wrapper around the `trash` crate.
//!
//! On Windows `trash` drives the Shell through COM and can panic when COM was
//! already initialised on the thread with another concurrency model
//! (`RPC_E_CHANGED_MODE`). Panics from the backend are turned into a
//! [`CleanError::Trash`] so a clean batch reports the task as failed and
//! keeps going.

use crate::error::CleanError;
use crate::worker::panic_message;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

pub fn delete(path: &Path) -> Result<(), CleanError> {
    match panic::catch_unwind(AssertUnwindSafe(|| trash::delete(path))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(CleanError::Trash(err.to_string())),
        Err(payload) => Err(CleanError::Trash(format!(
            "trash backend panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}
