// src/watch/store.rs

//! Shared scan state: one `WatchEntry` per registered directory.
//!
//! Every access goes through a single exclusive lock covering all entries.
//! Registration and scanning hold it for their whole body (see
//! [`WatchStore::with_entries`]), so two passes never interleave, even for
//! unrelated directories. Callers only see the store's operations, so the
//! locking granularity can change without touching them.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::error;

use crate::watch::digest::Digest;
use crate::watch::pattern::SearchPattern;

/// Last-known state of one watched directory.
#[derive(Debug, Clone)]
pub struct WatchEntry {
    directory: PathBuf,
    search_pattern: SearchPattern,
    include_subdirectories: bool,
    /// Absolute file path -> digest, as observed by the latest pass.
    pub fingerprints: BTreeMap<PathBuf, Digest>,
}

impl WatchEntry {
    pub fn new(
        directory: impl Into<PathBuf>,
        search_pattern: SearchPattern,
        include_subdirectories: bool,
        fingerprints: BTreeMap<PathBuf, Digest>,
    ) -> Self {
        Self {
            directory: directory.into(),
            search_pattern,
            include_subdirectories,
            fingerprints,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn search_pattern(&self) -> &SearchPattern {
        &self.search_pattern
    }

    pub fn include_subdirectories(&self) -> bool {
        self.include_subdirectories
    }
}

/// The map guarded by the store lock.
///
/// Only reachable through [`WatchStore::with_entries`], i.e. while the lock
/// is held.
#[derive(Debug, Default)]
pub struct WatchEntries {
    map: HashMap<PathBuf, WatchEntry>,
}

impl WatchEntries {
    pub fn get(&self, directory: &Path) -> Option<&WatchEntry> {
        self.map.get(directory)
    }

    pub fn get_mut(&mut self, directory: &Path) -> Option<&mut WatchEntry> {
        self.map.get_mut(directory)
    }

    /// Insert or wholesale replace the entry for `entry.directory()`.
    ///
    /// Returns the replaced entry, if any.
    pub fn set(&mut self, entry: WatchEntry) -> Option<WatchEntry> {
        self.map.insert(entry.directory.clone(), entry)
    }

    pub fn for_each(&self, mut visit: impl FnMut(&Path, &WatchEntry)) {
        for (dir, entry) in &self.map {
            visit(dir, entry);
        }
    }

    pub fn directories(&self) -> Vec<PathBuf> {
        self.map.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Concurrency-guarded mapping from watched directory to its entry.
#[derive(Debug, Default)]
pub struct WatchStore {
    entries: Mutex<WatchEntries>,
}

impl WatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, WatchEntries> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                // Entries are replaced wholesale, so a panic mid-pass leaves
                // the map in its previous state.
                error!("watch store mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Run `f` with exclusive access to every entry.
    pub fn with_entries<R>(&self, f: impl FnOnce(&mut WatchEntries) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Snapshot of the entry for `directory`.
    pub fn get(&self, directory: &Path) -> Option<WatchEntry> {
        self.lock().get(directory).cloned()
    }

    pub fn set(&self, entry: WatchEntry) -> Option<WatchEntry> {
        self.lock().set(entry)
    }

    pub fn for_each(&self, visit: impl FnMut(&Path, &WatchEntry)) {
        self.lock().for_each(visit)
    }

    pub fn directories(&self) -> Vec<PathBuf> {
        self.lock().directories()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
