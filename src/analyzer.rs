//! Disk space analysis: a size-annotated tree of a directory plus running
//! statistics (extension histogram, largest files and directories).

use crate::filter::dotted_extension;
use crate::paths;
use crate::scanner::NO_EXTENSION;
use crate::size;
use crate::walker::TreeWalker;
use crate::worker::{self, AbortHandle, RunFlag, WorkerSlot};
use log::{error, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Length of the largest-files and largest-dirs lists
pub const TOP_N: usize = 20;

/// Index of a node inside a [`DiskTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Serialize)]
pub struct DiskItem {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub children: Vec<NodeId>,
    /// Lookup only; the tree owns every node
    pub parent: Option<NodeId>,
}

/// Arena of [`DiskItem`]s; the root is always the first node
#[derive(Debug, Clone, Serialize)]
pub struct DiskTree {
    nodes: Vec<DiskItem>,
}

impl DiskTree {
    pub fn new(root: PathBuf, is_dir: bool, size: u64) -> Self {
        Self {
            nodes: vec![DiskItem {
                name: display_name(&root),
                path: root,
                is_dir,
                size,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_child(&mut self, parent: NodeId, path: PathBuf, is_dir: bool, size: u64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DiskItem {
            name: display_name(&path),
            path,
            is_dir,
            size,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_size(&mut self, id: NodeId, size: u64) {
        self.nodes[id.0].size = size;
    }

    pub fn get(&self, id: NodeId) -> &DiskItem {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<&DiskItem> {
        self.nodes[id.0].parent.map(|p| &self.nodes[p.0])
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &DiskItem> {
        self.nodes[id.0].children.iter().map(move |c| &self.nodes[c.0])
    }

    /// Children ordered by size, largest first
    pub fn children_by_size(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = self.nodes[id.0].children.clone();
        ids.sort_by(|a, b| self.nodes[b.0].size.cmp(&self.nodes[a.0].size));
        ids
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn find(&self, path: &Path) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.path == path).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// One row of a summary: a label, its size and its share of the total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeShare {
    pub label: String,
    pub size: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalyzeResult {
    /// `None` when the analyzed path could not be read
    pub tree: Option<DiskTree>,
    pub file_count: u64,
    pub dir_count: u64,
    pub total_size: u64,
    pub file_types: BTreeMap<String, u64>,
    pub largest_files: Vec<SizeEntry>,
    pub largest_dirs: Vec<SizeEntry>,
}

impl AnalyzeResult {
    pub fn record_file(&mut self, path: &Path, size: u64) {
        self.file_count += 1;
        self.total_size += size;
        let ext = dotted_extension(path).unwrap_or_else(|| NO_EXTENSION.to_string());
        *self.file_types.entry(ext).or_insert(0) += size;
        insert_top(&mut self.largest_files, path, size);
    }

    pub fn record_dir(&mut self, path: &Path, size: u64) {
        self.dir_count += 1;
        insert_top(&mut self.largest_dirs, path, size);
    }

    /// Add a node to the tree in place; `None` before the root exists
    pub(crate) fn add_node(
        &mut self,
        parent: NodeId,
        path: PathBuf,
        is_dir: bool,
        size: u64,
    ) -> Option<NodeId> {
        self.tree
            .as_mut()
            .map(|tree| tree.add_child(parent, path, is_dir, size))
    }

    pub(crate) fn set_node_size(&mut self, id: NodeId, size: u64) {
        if let Some(tree) = self.tree.as_mut() {
            tree.set_size(id, size);
        }
    }

    /// Extensions by total size, largest first
    pub fn file_types_summary(&self) -> Vec<SizeShare> {
        let mut rows: Vec<SizeShare> = self
            .file_types
            .iter()
            .map(|(ext, &size)| self.share(ext.clone(), size))
            .collect();
        rows.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.label.cmp(&b.label)));
        rows
    }

    pub fn largest_files_summary(&self) -> Vec<SizeShare> {
        self.entries_summary(&self.largest_files)
    }

    pub fn largest_dirs_summary(&self) -> Vec<SizeShare> {
        self.entries_summary(&self.largest_dirs)
    }

    fn entries_summary(&self, entries: &[SizeEntry]) -> Vec<SizeShare> {
        entries
            .iter()
            .map(|e| self.share(e.path.display().to_string(), e.size))
            .collect()
    }

    fn share(&self, label: String, size: u64) -> SizeShare {
        SizeShare {
            label,
            size,
            percent: size::percentage(size, self.total_size),
        }
    }
}

/// Keep `list` sorted descending and at most [`TOP_N`] long
fn insert_top(list: &mut Vec<SizeEntry>, path: &Path, size: u64) {
    if list.len() >= TOP_N && list.last().map_or(false, |last| size <= last.size) {
        return;
    }
    let pos = list.iter().position(|e| e.size < size).unwrap_or(list.len());
    list.insert(
        pos,
        SizeEntry {
            path: path.to_path_buf(),
            size,
        },
    );
    list.truncate(TOP_N);
}

#[derive(Default)]
pub struct Analyzer {
    running: RunFlag,
    abort: AbortHandle,
    worker: WorkerSlot,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start analyzing `path` on a worker thread.
    ///
    /// `on_progress` gets the current file and the running file and
    /// directory counts after every file. `on_complete` fires exactly once,
    /// with a partial result after an abort. Returns `false` if an analysis
    /// is already running or the worker cannot be started.
    pub fn analyze<P, C>(
        &self,
        path: impl AsRef<Path>,
        max_depth: Option<usize>,
        on_progress: P,
        on_complete: C,
    ) -> bool
    where
        P: FnMut(&Path, u64, u64) + Send + 'static,
        C: FnOnce(AnalyzeResult) + Send + 'static,
    {
        let Some(guard) = self.running.try_acquire() else {
            warn!("An analysis is already in progress");
            return false;
        };
        self.abort.reset();

        let root = paths::normalize_path(path.as_ref());
        let abort = self.abort.clone();
        let mut on_progress = on_progress;

        let spawned = worker::spawn("tidyup-analyze", move || {
            let mut result = AnalyzeResult::default();
            worker::run_guarded("analyze", || {
                TreeWalker::new(&abort).build_tree(&root, max_depth, &mut result, &mut on_progress)
            });
            drop(guard);
            on_complete(result);
        });

        match spawned {
            Ok(handle) => {
                self.worker.store(handle);
                true
            }
            Err(e) => {
                error!("Failed to start analyze worker: {}", e);
                false
            }
        }
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn wait(&self) {
        self.worker.join();
    }
}
