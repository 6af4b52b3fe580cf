//! Path precheck feature.
//!
//! This module owns path eligibility checks prior to deletion and the
//! best-effort "is it locked" probe used to explain I/O failures.

use crate::error::CleanError;
use crate::paths;
use std::io;
use std::path::Path;

/// Refuse protected system paths and paths that no longer exist
pub(crate) fn precheck_path(path: &Path) -> Result<(), CleanError> {
    if paths::is_system_path(path) {
        return Err(CleanError::Protected(path.to_path_buf()));
    }

    // symlink_metadata so a dangling link still counts as present
    match path.symlink_metadata() {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(CleanError::NotFound),
        Err(e) => Err(CleanError::io("inspect path", e)),
    }
}

/// Wrap an I/O failure, marking it as a lock problem when the probe says so.
///
/// The probe is advisory: it can miss a lock taken right after it ran, so it
/// only changes the message and never whether the deletion is attempted.
pub(crate) fn describe_failure(path: &Path, action: &'static str, err: io::Error) -> CleanError {
    if err.kind() == io::ErrorKind::NotFound {
        return CleanError::NotFound;
    }
    if is_path_locked(path) {
        CleanError::Locked { action, source: err }
    } else {
        CleanError::io(action, err)
    }
}

/// Check if a path is locked by another process (Windows-specific)
///
/// Attempts to open the path with DELETE access and full sharing. If it fails with
/// sharing/access errors, the path is considered in use.
#[cfg(windows)]
pub(crate) fn is_path_locked(path: &Path) -> bool {
    use std::fs::OpenOptions;
    use std::os::windows::fs::OpenOptionsExt;

    if !path.exists() {
        return false;
    }

    const FILE_SHARE_READ: u32 = 0x00000001;
    const FILE_SHARE_WRITE: u32 = 0x00000002;
    const FILE_SHARE_DELETE: u32 = 0x00000004;
    const DELETE: u32 = 0x00010000;
    const FILE_FLAG_BACKUP_SEMANTICS: u32 = 0x02000000;

    let mut options = OpenOptions::new();
    options
        .access_mode(DELETE)
        .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE);
    if path.is_dir() {
        options.custom_flags(FILE_FLAG_BACKUP_SEMANTICS);
    }

    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    matches!(options.open(path), Err(e) if matches!(e.raw_os_error(), Some(32) | Some(33)))
}

#[cfg(not(windows))]
pub(crate) fn is_path_locked(_path: &Path) -> bool {
    // Unix locks are advisory and never prevent unlinking
    false
}
