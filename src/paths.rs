//! Well-known junk locations and protected system directories
//!
//! Everything here is resolved per OS at call time. Lookups that return lists
//! only include directories that currently exist, so callers can build scan
//! targets from them without further checks.

use std::env;
use std::path::{Component, Path, PathBuf};

pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// The primary OS temp directory
pub fn temp_dir() -> PathBuf {
    env::temp_dir()
}

/// All existing temp directories for this OS, primary first, without duplicates
pub fn temp_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![temp_dir()];
    let home = home_dir();

    if cfg!(windows) {
        dirs.push(env_dir("SYSTEMROOT", r"C:\Windows").join("Temp"));
        if let Ok(local) = env::var("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Temp"));
        }
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/private/tmp"));
        dirs.push(PathBuf::from("/private/var/tmp"));
        if let Some(home) = &home {
            dirs.push(home.join("Library").join("Caches"));
        }
    } else {
        dirs.push(PathBuf::from("/tmp"));
        dirs.push(PathBuf::from("/var/tmp"));
        if let Some(home) = &home {
            dirs.push(home.join(".cache"));
        }
    }

    existing_unique(dirs)
}

/// Existing system and user log directories
pub fn log_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if cfg!(windows) {
        let root = env_dir("SYSTEMROOT", r"C:\Windows");
        dirs.push(root.join("Logs"));
        dirs.push(root.join("debug"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/var/log"));
        if let Some(home) = home_dir() {
            dirs.push(home.join("Library").join("Logs"));
        }
    } else {
        dirs.push(PathBuf::from("/var/log"));
    }

    existing_unique(dirs)
}

/// Existing browser cache directories as `(browser, path)` pairs
pub fn browser_cache_dirs() -> Vec<(String, PathBuf)> {
    let mut caches: Vec<(&str, PathBuf)> = Vec::new();
    let home = home_dir();

    if cfg!(windows) {
        if let Ok(local) = env::var("LOCALAPPDATA") {
            let local = PathBuf::from(local);
            caches.push((
                "Chrome",
                join_all(&local, &["Google", "Chrome", "User Data", "Default", "Cache"]),
            ));
            caches.push(("Firefox", join_all(&local, &["Mozilla", "Firefox", "Profiles"])));
            caches.push((
                "Edge",
                join_all(&local, &["Microsoft", "Edge", "User Data", "Default", "Cache"]),
            ));
        }
    } else if let Some(home) = &home {
        if cfg!(target_os = "macos") {
            let caches_dir = home.join("Library").join("Caches");
            caches.push(("Chrome", join_all(&caches_dir, &["Google", "Chrome"])));
            caches.push(("Firefox", caches_dir.join("Firefox")));
            caches.push(("Safari", caches_dir.join("com.apple.Safari")));
        } else {
            caches.push(("Chrome", join_all(home, &[".cache", "google-chrome"])));
            caches.push(("Chromium", join_all(home, &[".cache", "chromium"])));
            caches.push(("Firefox", join_all(home, &[".cache", "mozilla", "firefox"])));
        }
    }

    caches
        .into_iter()
        .filter(|(_, path)| path.is_dir())
        .map(|(name, path)| (name.to_string(), path))
        .collect()
}

/// Location of the user's recycle bin / trash directory (may not exist)
pub fn recycle_bin_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        let drive = env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string());
        Some(PathBuf::from(format!(r"{}\$Recycle.Bin", drive)))
    } else if cfg!(target_os = "macos") {
        home_dir().map(|home| home.join(".Trash"))
    } else {
        home_dir().map(|home| join_all(&home, &[".local", "share", "Trash"]))
    }
}

/// Directories whose contents must never be cleaned
pub fn protected_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        let windir = env_dir("WINDIR", r"C:\Windows");
        vec![
            windir.join("System32"),
            windir.join("SysWOW64"),
            windir,
            env_dir("PROGRAMFILES", r"C:\Program Files"),
            env_dir("PROGRAMFILES(X86)", r"C:\Program Files (x86)"),
        ]
    } else if cfg!(target_os = "macos") {
        ["/System", "/Library", "/Applications", "/usr/bin", "/usr/lib", "/usr/local"]
            .iter()
            .map(PathBuf::from)
            .collect()
    } else {
        [
            "/bin",
            "/usr/bin",
            "/sbin",
            "/usr/sbin",
            "/lib",
            "/usr/lib",
            "/usr/local",
            "/opt",
        ]
        .iter()
        .map(PathBuf::from)
        .collect()
    }
}

/// Check if path is (or lies under) a protected system directory
pub fn is_system_path(path: &Path) -> bool {
    let path = normalize_path(path);
    protected_dirs()
        .iter()
        .any(|dir| is_within(&path, dir))
}

/// Component-wise prefix check; case-insensitive on Windows
fn is_within(path: &Path, dir: &Path) -> bool {
    if cfg!(windows) {
        let lower = |p: &Path| PathBuf::from(p.to_string_lossy().to_lowercase());
        lower(path).starts_with(lower(dir))
    } else {
        path.starts_with(dir)
    }
}

/// Expand a leading `~` and lexically resolve `.` and `..` components.
///
/// Does not touch the filesystem, so it works for paths that no longer exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in expanded.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal =
                    matches!(normalized.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}

/// `path` relative to `base`, or `path` itself when it is not under `base`
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

fn env_dir(var: &str, fallback: &str) -> PathBuf {
    env::var(var)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(fallback))
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |acc, part| acc.join(part))
}

fn existing_unique(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: Vec<PathBuf> = Vec::new();
    for dir in dirs {
        if dir.is_dir() && !seen.contains(&dir) {
            seen.push(dir);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_resolves_dots() {
        assert_eq!(
            normalize_path(Path::new("/var/./log/../tmp")),
            PathBuf::from("/var/tmp")
        );
        assert_eq!(normalize_path(Path::new("a/b/..")), PathBuf::from("a"));
        assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize_path(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_normalize_path_expands_home() {
        if let Some(home) = home_dir() {
            assert_eq!(normalize_path(Path::new("~/notes")), home.join("notes"));
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn test_system_path_detection_linux() {
        assert!(is_system_path(Path::new("/usr/bin")));
        assert!(is_system_path(Path::new("/usr/lib/x86_64-linux-gnu/libc.so.6")));
        assert!(is_system_path(Path::new("/opt/../usr/local/share")));
        assert!(!is_system_path(Path::new("/optional/data")));
        assert!(!is_system_path(Path::new("/home/user/.cache/thing")));
        assert!(!is_system_path(Path::new("/var/log/syslog")));
    }

    #[test]
    fn test_temp_dir_is_not_protected() {
        assert!(!is_system_path(&temp_dir()));
    }

    #[test]
    fn test_temp_dirs_exist_and_are_unique() {
        let dirs = temp_dirs();
        assert!(!dirs.is_empty());
        for (i, dir) in dirs.iter().enumerate() {
            assert!(dir.is_dir());
            assert!(!dirs[i + 1..].contains(dir));
        }
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/a/b/c.txt"), Path::new("/a")),
            PathBuf::from("b/c.txt")
        );
        assert_eq!(
            relative_to(Path::new("/x/y"), Path::new("/a")),
            PathBuf::from("/x/y")
        );
    }
}
