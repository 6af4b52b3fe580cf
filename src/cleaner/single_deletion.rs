//! Single deletion feature.
//!
//! This module owns deletion of one path with a chosen [`CleanMethod`].

use super::path_precheck::{describe_failure, precheck_path};
use super::secure_delete::secure_delete;
use super::CleanMethod;
use crate::error::CleanError;
use crate::trash_ops;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Clean one path with `method`, after the protected/missing precheck
pub(crate) fn clean_path(path: &Path, method: CleanMethod) -> Result<(), CleanError> {
    precheck_path(path)?;

    match method {
        CleanMethod::Trash => trash_ops::delete(path).map_err(|err| {
            if path.symlink_metadata().is_err() {
                CleanError::NotFound
            } else {
                err
            }
        }),
        CleanMethod::Permanent => remove_permanently(path),
        CleanMethod::Rename => rename_to_backup(path).map(|_| ()),
        CleanMethod::Secure => secure_delete(path),
    }
}

/// Remove a file, or a directory with all its contents
pub(crate) fn remove_permanently(path: &Path) -> Result<(), CleanError> {
    let is_dir = path
        .symlink_metadata()
        .map(|m| m.is_dir())
        .map_err(|e| describe_failure(path, "inspect path", e))?;

    if is_dir {
        fs::remove_dir_all(path).map_err(|e| describe_failure(path, "remove directory", e))
    } else {
        fs::remove_file(path).map_err(|e| describe_failure(path, "remove file", e))
    }
}

/// Rename `path` to its first free backup name and return that name
pub(crate) fn rename_to_backup(path: &Path) -> Result<PathBuf, CleanError> {
    let target = backup_path(path, Utc::now().timestamp());
    fs::rename(path, &target).map_err(|e| describe_failure(path, "rename", e))?;
    Ok(target)
}

/// `<name>.bak`, else `<name>.<epoch>.bak`, else `<name>.<epoch>-<n>.bak`
pub(crate) fn backup_path(path: &Path, epoch: i64) -> PathBuf {
    let with_suffix = |suffix: &str| {
        let mut name = path.as_os_str().to_os_string();
        name.push(suffix);
        PathBuf::from(name)
    };

    let plain = with_suffix(".bak");
    if !exists(&plain) {
        return plain;
    }

    let stamped = with_suffix(&format!(".{}.bak", epoch));
    if !exists(&stamped) {
        return stamped;
    }

    (1u64..)
        .map(|n| with_suffix(&format!(".{}-{}.bak", epoch, n)))
        .find(|candidate| !exists(candidate))
        .unwrap_or(stamped)
}

fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
