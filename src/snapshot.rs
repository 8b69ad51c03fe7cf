//! Last-known content of every tracked file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

/// A file's content as of the last successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSnapshot {
    pub path: PathBuf,
    pub content: String,
}

/// Shared map from path to snapshot content.
///
/// Cloning the store yields another handle to the same map. Reads hand out
/// owned copies, so stored content is only ever replaced through `put`.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<RwLock<HashMap<PathBuf, String>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content recorded for `path`, or an empty string when untracked.
    pub fn get<P: AsRef<Path>>(&self, path: P) -> String {
        self.inner
            .read()
            .get(path.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the snapshot for `path`.
    pub fn put<P: Into<PathBuf>>(&self, path: P, content: String) {
        self.inner.write().insert(path.into(), content);
    }

    /// Drops the snapshot for `path`, returning it if one existed.
    pub fn remove<P: AsRef<Path>>(&self, path: P) -> Option<FileSnapshot> {
        let path = path.as_ref();
        self.inner
            .write()
            .remove(path)
            .map(|content| FileSnapshot {
                path: path.to_path_buf(),
                content,
            })
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.inner.read().contains_key(path.as_ref())
    }

    /// Drops every snapshot below `dir`, for directories that were removed
    /// or renamed away. Returns how many were dropped.
    pub fn remove_under<P: AsRef<Path>>(&self, dir: P) -> usize {
        let dir = dir.as_ref();
        let mut inner = self.inner.write();
        let before = inner.len();
        inner.retain(|path, _| !path.starts_with(dir) || path == dir);
        before - inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}
