//! Directory traversal for scanning and analysis.
//!
//! [`TreeWalker`] has two modes:
//! - flat collection ([`TreeWalker::collect_matches`]): every file under a
//!   root that passes a [`FileFilter`] is recorded into a [`ScanResult`];
//! - tree building ([`TreeWalker::build_tree`]): a [`DiskTree`] with
//!   post-order directory sizes plus running statistics in an
//!   [`AnalyzeResult`].
//!
//! Both check the abort handle before every entry and stop quietly, keeping
//! whatever was gathered so far. Unreadable entries are logged and skipped.

use crate::analyzer::{AnalyzeResult, DiskTree, NodeId};
use crate::filter::FileFilter;
use crate::scanner::ScanResult;
use crate::worker::AbortHandle;
use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct TreeWalker<'a> {
    abort: &'a AbortHandle,
}

impl<'a> TreeWalker<'a> {
    pub fn new(abort: &'a AbortHandle) -> Self {
        Self { abort }
    }

    /// Record every regular file under `root` accepted by `filter`.
    ///
    /// With `recursive == false` only the root's direct entries are checked.
    /// Symlinks are never followed.
    pub fn collect_matches(
        &self,
        root: &Path,
        recursive: bool,
        filter: &FileFilter,
        result: &mut ScanResult,
    ) {
        let mut walk = WalkDir::new(root).follow_links(false).min_depth(1);
        if !recursive {
            walk = walk.max_depth(1);
        }

        let mut iter = walk.into_iter();
        loop {
            if self.abort.is_aborted() {
                debug!("walk of {} aborted", root.display());
                break;
            }

            let entry = match iter.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    debug!("skipping unreadable entry under {}: {}", root.display(), err);
                    continue;
                }
                None => break,
            };

            if entry.file_type().is_dir() {
                if is_windows_reparse_point(entry.path()) {
                    iter.skip_current_dir();
                }
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    debug!("cannot stat {}: {}", entry.path().display(), err);
                    continue;
                }
            };
            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(err) => {
                    debug!("no modification time for {}: {}", entry.path().display(), err);
                    continue;
                }
            };

            if filter.matches(entry.path(), metadata.len(), modified) {
                result.add_file(entry.path().to_path_buf(), metadata.len(), modified);
            }
        }
    }

    /// Build the size-annotated tree for `root` into `result`.
    ///
    /// `max_depth` bounds the tree: the root is depth 0, entries deeper than
    /// `max_depth` are not added and directories at exactly `max_depth` are
    /// added but not descended (their size stays 0).
    pub fn build_tree(
        &self,
        root: &Path,
        max_depth: Option<usize>,
        result: &mut AnalyzeResult,
        on_file: &mut dyn FnMut(&Path, u64, u64),
    ) {
        let metadata = match fs::metadata(root) {
            Ok(m) => m,
            Err(err) => {
                warn!("cannot analyze {}: {}", root.display(), err);
                return;
            }
        };

        if !metadata.is_dir() {
            let size = metadata.len();
            result.tree = Some(DiskTree::new(root.to_path_buf(), false, size));
            result.record_file(root, size);
            on_file(root, result.file_count, result.dir_count);
            return;
        }

        // Built in place so an interrupted walk still leaves the visited nodes
        let root_id = result
            .tree
            .insert(DiskTree::new(root.to_path_buf(), true, 0))
            .root();
        let size = if descends(0, max_depth) {
            self.visit_dir(root, root_id, 0, max_depth, result, on_file)
        } else {
            0
        };
        result.set_node_size(root_id, size);
        result.record_dir(root, size);
    }

    /// Add the children of `dir` under `node`; returns their summed size
    fn visit_dir(
        &self,
        dir: &Path,
        node: NodeId,
        depth: usize,
        max_depth: Option<usize>,
        stats: &mut AnalyzeResult,
        on_file: &mut dyn FnMut(&Path, u64, u64),
    ) -> u64 {
        if self.abort.is_aborted() {
            return 0;
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                debug!("permission denied: {}", dir.display());
                return 0;
            }
            Err(err) => {
                warn!("cannot read directory {}: {}", dir.display(), err);
                return 0;
            }
        };

        let mut total = 0u64;
        for entry in entries {
            if self.abort.is_aborted() {
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping entry in {}: {}", dir.display(), err);
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    debug!("cannot read type of {}: {}", path.display(), err);
                    continue;
                }
            };

            if file_type.is_dir() {
                if is_windows_reparse_point(&path) {
                    continue;
                }
                let Some(child) = stats.add_node(node, path.clone(), true, 0) else {
                    break;
                };
                let child_depth = depth + 1;
                let size = if descends(child_depth, max_depth) {
                    self.visit_dir(&path, child, child_depth, max_depth, stats, on_file)
                } else {
                    0
                };
                stats.set_node_size(child, size);
                stats.record_dir(&path, size);
                total += size;
            } else if file_type.is_file() {
                let size = match entry.metadata() {
                    Ok(m) => m.len(),
                    Err(err) => {
                        debug!("cannot stat {}: {}", path.display(), err);
                        continue;
                    }
                };
                stats.add_node(node, path.clone(), false, size);
                stats.record_file(&path, size);
                total += size;
                on_file(&path, stats.file_count, stats.dir_count);
            }
        }

        total
    }
}

fn descends(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.map_or(true, |max| depth < max)
}

/// Total size of all regular files below `path` (or its own size for a file).
///
/// Iterative so deep trees cannot exhaust the stack; symlinks and reparse
/// points are not followed and unreadable directories count as empty.
pub fn dir_size(path: &Path) -> u64 {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(_) => return 0,
    };
    if !meta.is_dir() {
        return meta.len();
    }

    let mut total = 0u64;
    let mut stack: Vec<PathBuf> = vec![path.to_path_buf()];

    while let Some(current) = stack.pop() {
        if is_windows_reparse_point(&current) {
            continue;
        }
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let meta = match fs::symlink_metadata(entry.path()) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if meta.is_file() {
                total += meta.len();
            } else if meta.is_dir() {
                stack.push(entry.path());
            }
        }
    }

    total
}

/// Returns true if this path is a Windows reparse point (junction/symlink/mount point).
///
/// Directory junctions are not symlinks as far as `file_type()` is concerned
/// and can form cycles, so both walk modes skip them explicitly.
pub fn is_windows_reparse_point(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if let Ok(meta) = fs::symlink_metadata(path) {
            return meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0;
        }
        false
    }
    #[cfg(not(windows))]
    {
        let _ = path;
        false
    }
}
