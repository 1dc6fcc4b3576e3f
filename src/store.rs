//! Per-file storage of the current trackable set.
//!
//! Each file key owns one slot guarded by its own mutex, so reconciliations of
//! different files proceed in parallel while operations on the same file are
//! serialized. The outer map lock is only held long enough to look up or
//! create a slot, never across a reconciliation.
//!
//! A slot holds `Option<Vec<Trackable>>`: `None` means the file has never been
//! reconciled (true first encounter), `Some(vec![])` means the file is known
//! with zero current findings. The tracker's first-run behavior depends on
//! that distinction.

use crate::models::Trackable;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

type Slot<C> = Arc<Mutex<Option<Vec<Trackable<C>>>>>;

/// Keyed collection of the single current trackable set per file.
pub struct TrackableStore<C> {
    files: RwLock<HashMap<String, Slot<C>>>,
}

impl<C> Default for TrackableStore<C> {
    fn default() -> Self {
        TrackableStore {
            files: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: Clone> TrackableStore<C> {
    pub fn new() -> Self {
        TrackableStore {
            files: RwLock::new(HashMap::new()),
        }
    }

    fn slot(&self, file_id: &str) -> Slot<C> {
        let files = self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = files.get(file_id) {
            return Arc::clone(slot);
        }
        drop(files);
        let mut files = self
            .files
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            files
                .entry(file_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(None))),
        )
    }

    /// Snapshot of the current set, or `None` if the file has never been
    /// reconciled.
    pub fn get(&self, file_id: &str) -> Option<Vec<Trackable<C>>> {
        let slot = self.slot(file_id);
        let guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Snapshot of the current set, empty if the file is unknown.
    pub fn current_of(&self, file_id: &str) -> Vec<Trackable<C>> {
        self.get(file_id).unwrap_or_default()
    }

    /// Atomically swap the current set for a file.
    pub fn replace(&self, file_id: &str, trackables: Vec<Trackable<C>>) {
        self.update(file_id, |slot| *slot = Some(trackables));
    }

    /// Forget a file entirely; a later reconciliation sees a true first run.
    pub fn evict(&self, file_id: &str) {
        let mut files = self
            .files
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        files.remove(file_id);
    }

    /// Drop all files.
    pub fn clear(&self) {
        let mut files = self
            .files
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        files.clear();
    }

    /// Run `f` with exclusive access to the file's slot. The per-file lock is
    /// held for the whole closure, so a reconciliation reads and writes the
    /// slot as one atomic step and readers only ever observe the state before
    /// or after it.
    pub(crate) fn update<R>(
        &self,
        file_id: &str,
        f: impl FnOnce(&mut Option<Vec<Trackable<C>>>) -> R,
    ) -> R {
        let slot = self.slot(file_id);
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
