// src/watch/batch.rs

use std::mem;
use std::path::{Path, PathBuf};

/// One debounce window worth of changes, paths relative to the watch root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub added: Vec<PathBuf>,
    pub changed: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
}

impl ChangeBatch {
    pub fn new(added: Vec<PathBuf>, changed: Vec<PathBuf>, deleted: Vec<PathBuf>) -> Self {
        Self {
            added,
            changed,
            deleted,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.changed.len() + self.deleted.len()
    }

    /// Added, then changed, then deleted.
    pub fn all_paths(&self) -> impl Iterator<Item = &Path> {
        self.added
            .iter()
            .chain(self.changed.iter())
            .chain(self.deleted.iter())
            .map(PathBuf::as_path)
    }

    /// Copy of this batch keeping only paths for which `keep` holds.
    pub fn retain<F>(&self, mut keep: F) -> ChangeBatch
    where
        F: FnMut(&Path) -> bool,
    {
        let mut pick = |paths: &[PathBuf]| -> Vec<PathBuf> {
            paths.iter().filter(|p| keep(p.as_path())).cloned().collect()
        };
        ChangeBatch {
            added: pick(&self.added),
            changed: pick(&self.changed),
            deleted: pick(&self.deleted),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Changed,
    Deleted,
}

/// Accumulates classified events for one window.
///
/// Each path lands in at most one list:
/// - added then deleted: dropped, it never existed from the outside
/// - deleted then added: changed
/// - added or changed again: stays where it is
/// - changed then deleted: deleted
#[derive(Debug, Default)]
pub struct BatchBuilder {
    batch: ChangeBatch,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: ChangeKind, path: PathBuf) {
        let b = &mut self.batch;
        match kind {
            ChangeKind::Added => {
                if remove(&mut b.deleted, &path) {
                    b.changed.push(path);
                } else if !b.added.contains(&path) && !b.changed.contains(&path) {
                    b.added.push(path);
                }
            }
            ChangeKind::Changed => {
                if remove(&mut b.deleted, &path) {
                    b.changed.push(path);
                } else if !b.added.contains(&path) && !b.changed.contains(&path) {
                    b.changed.push(path);
                }
            }
            ChangeKind::Deleted => {
                if remove(&mut b.added, &path) {
                    return;
                }
                remove(&mut b.changed, &path);
                if !b.deleted.contains(&path) {
                    b.deleted.push(path);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Hand out the accumulated batch and start over.
    pub fn take(&mut self) -> ChangeBatch {
        mem::take(&mut self.batch)
    }
}

fn remove(paths: &mut Vec<PathBuf>, path: &Path) -> bool {
    match paths.iter().position(|p| p == path) {
        Some(idx) => {
            paths.remove(idx);
            true
        }
        None => false,
    }
}
