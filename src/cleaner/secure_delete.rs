//! Secure delete feature.
//!
//! Overwrites a file in place with fixed byte patterns before unlinking it.
//! Overwriting is best effort: SSD wear levelling and copy-on-write file
//! systems can keep old blocks around.

use super::path_precheck::describe_failure;
use super::single_deletion::remove_permanently;
use crate::error::CleanError;
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

const CHUNK_SIZE: usize = 1024 * 1024;
const PASS_PATTERNS: [u8; 3] = [0xFF, 0x00, 0xAA];

/// Overwrite `path` three times, then delete it.
///
/// Directories are removed recursively without overwriting. If an overwrite
/// pass fails the file is still deleted plainly; the task fails only when
/// that deletion fails as well.
pub(crate) fn secure_delete(path: &Path) -> Result<(), CleanError> {
    delete_after(path, overwrite)
}

/// Run `overwrite` on a regular file, then unlink it whatever the outcome
fn delete_after<F>(path: &Path, overwrite: F) -> Result<(), CleanError>
where
    F: FnOnce(&Path, u64) -> io::Result<()>,
{
    let meta = path
        .symlink_metadata()
        .map_err(|e| describe_failure(path, "inspect path", e))?;

    if meta.is_dir() {
        return remove_permanently(path);
    }

    if meta.is_file() {
        if let Err(err) = overwrite(path, meta.len()) {
            warn!(
                "Overwriting {} failed ({}), deleting without overwrite",
                path.display(),
                err
            );
        }
    }

    fs::remove_file(path).map_err(|e| describe_failure(path, "remove file", e))
}

fn overwrite(path: &Path, size: u64) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE.min(size as usize).max(1)];

    for (pass, &pattern) in PASS_PATTERNS.iter().enumerate() {
        debug!(
            "Secure delete pass {}/{} on {}",
            pass + 1,
            PASS_PATTERNS.len(),
            path.display()
        );
        buf.fill(pattern);
        file.seek(SeekFrom::Start(0))?;

        let mut remaining = size;
        while remaining > 0 {
            let chunk = remaining.min(buf.len() as u64) as usize;
            file.write_all(&buf[..chunk])?;
            remaining -= chunk as u64;
        }

        file.flush()?;
        file.sync_all()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_overwrite_leaves_last_pattern() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("secret.bin");
        fs::write(&file, vec![0x11u8; 3000]).unwrap();

        overwrite(&file, 3000).unwrap();
        let content = fs::read(&file).unwrap();
        assert_eq!(content.len(), 3000);
        assert!(content.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_secure_delete_removes_file() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("secret.txt");
        fs::write(&file, "top secret").unwrap();

        secure_delete(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_secure_delete_empty_file() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("empty");
        fs::write(&file, b"").unwrap();

        secure_delete(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_failed_overwrite_still_deletes() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("stubborn.bin");
        fs::write(&file, vec![0x11u8; 64]).unwrap();

        let result = delete_after(&file, |_, _| {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });
        assert!(result.is_ok());
        assert!(!file.exists());
    }

    #[test]
    fn test_failed_overwrite_of_missing_file_reports_not_found() {
        let temp_dir = create_test_dir();
        let file = temp_dir.path().join("vanished.bin");
        fs::write(&file, "x").unwrap();

        let result = delete_after(&file, |path, _| {
            fs::remove_file(path)?;
            Err(io::Error::new(io::ErrorKind::Other, "interrupted"))
        });
        assert!(matches!(result, Err(CleanError::NotFound)));
    }

    #[test]
    fn test_secure_delete_directory() {
        let temp_dir = create_test_dir();
        let dir = temp_dir.path().join("dir");
        fs::create_dir_all(dir.join("inner")).unwrap();
        fs::write(dir.join("inner/a.txt"), "a").unwrap();

        secure_delete(&dir).unwrap();
        assert!(!dir.exists());
    }
}
