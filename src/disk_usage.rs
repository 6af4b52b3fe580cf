//! Volume usage queries backed by `sysinfo`

use crate::paths;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use sysinfo::{Disk, Disks};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

impl DiskUsage {
    fn of(disk: &Disk) -> Self {
        let total = disk.total_space();
        let free = disk.available_space();
        let used = total.saturating_sub(free);
        Self {
            total,
            used,
            free,
            percent: crate::size::percentage(used, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskInfo {
    pub mount_point: PathBuf,
    pub device: String,
    pub file_system: String,
    pub usage: DiskUsage,
}

/// Usage of the volume containing `path` (the filesystem root when `None`)
pub fn disk_usage(path: Option<&Path>) -> Result<DiskUsage> {
    let path = match path {
        Some(p) => paths::normalize_path(p),
        None => default_root(),
    };

    let disks = Disks::new_with_refreshed_list();
    // The mount point with the longest matching prefix owns the path
    disks
        .list()
        .iter()
        .filter(|disk| path.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().components().count())
        .map(DiskUsage::of)
        .with_context(|| format!("No mounted volume contains {}", path.display()))
}

/// All mounted volumes; loop devices are skipped
pub fn all_disks() -> Vec<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|disk| !is_loop_device(disk))
        .map(|disk| DiskInfo {
            mount_point: disk.mount_point().to_path_buf(),
            device: disk.name().to_string_lossy().into_owned(),
            file_system: disk.file_system().to_string_lossy().into_owned(),
            usage: DiskUsage::of(disk),
        })
        .collect()
}

fn is_loop_device(disk: &Disk) -> bool {
    cfg!(target_os = "linux") && disk.name().to_string_lossy().starts_with("/dev/loop")
}

fn default_root() -> PathBuf {
    if cfg!(windows) {
        let drive = std::env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string());
        PathBuf::from(format!("{}\\", drive))
    } else {
        PathBuf::from("/")
    }
}
