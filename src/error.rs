//! Typed per-task errors for the clean pipeline.
//!
//! The `Display` text of a [`CleanError`] is what ends up in
//! `CleanResult::error`, so messages are written for end users.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanError {
    #[error("file not found")]
    NotFound,

    #[error("protected system path: {}", .0.display())]
    Protected(PathBuf),

    #[error("{action} failed: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{action} failed, file appears to be locked by another process: {source}")]
    Locked {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("move to trash failed: {0}")]
    Trash(String),
}

impl CleanError {
    pub fn io(action: &'static str, source: io::Error) -> Self {
        CleanError::Io { action, source }
    }
}
