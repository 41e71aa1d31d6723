// src/engine/host.rs

//! The reload consumer side: where reported changes end up.
//!
//! The consumer owns a [`ChangeQueue`] and decides whether hot reload is
//! currently eligible. `pollwatch` only appends; draining and acting on the
//! records (recompiling, reloading) is the consumer's business.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::types::HostRunState;

/// A single forwarded change. Ownership moves to the consumer on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub file_path: PathBuf,
    pub detected_at: DateTime<Utc>,
}

impl ChangeRecord {
    pub fn new(file_path: impl Into<PathBuf>, detected_at: DateTime<Utc>) -> Self {
        Self {
            file_path: file_path.into(),
            detected_at,
        }
    }
}

/// Thread-safe, append-only (from our side) list of change records.
///
/// Its mutex guards only the list and is never held while scanning.
#[derive(Debug, Default)]
pub struct ChangeQueue {
    records: Mutex<Vec<ChangeRecord>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ChangeRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, record: ChangeRecord) {
        self.lock().push(record);
    }

    /// Take every queued record, leaving the queue empty.
    pub fn drain(&self) -> Vec<ChangeRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of the queued records, in append order.
    pub fn snapshot(&self) -> Vec<ChangeRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// What the watcher needs from whoever consumes its changes.
pub trait ReloadConsumer: Send + Sync {
    /// Whether a change detected right now should be forwarded.
    fn hot_reload_eligible(&self) -> bool;

    /// The queue forwarded changes are appended to.
    fn changes(&self) -> &ChangeQueue;
}

/// Ready-made consumer state for hosts without their own.
///
/// Eligible iff editor-mode hot reload is enabled or the host is `Running`.
#[derive(Debug, Default)]
pub struct HotReloadHost {
    editor_mode_hot_reload: AtomicBool,
    run_state: Mutex<HostRunState>,
    changes: ChangeQueue,
}

impl HotReloadHost {
    pub fn new(editor_mode_hot_reload: bool, run_state: HostRunState) -> Self {
        Self {
            editor_mode_hot_reload: AtomicBool::new(editor_mode_hot_reload),
            run_state: Mutex::new(run_state),
            changes: ChangeQueue::new(),
        }
    }

    pub fn set_editor_mode_hot_reload(&self, enabled: bool) {
        self.editor_mode_hot_reload.store(enabled, Ordering::SeqCst);
    }

    pub fn editor_mode_hot_reload(&self) -> bool {
        self.editor_mode_hot_reload.load(Ordering::SeqCst)
    }

    pub fn set_run_state(&self, state: HostRunState) {
        *self
            .run_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    pub fn run_state(&self) -> HostRunState {
        *self
            .run_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReloadConsumer for HotReloadHost {
    fn hot_reload_eligible(&self) -> bool {
        self.editor_mode_hot_reload() || self.run_state() == HostRunState::Running
    }

    fn changes(&self) -> &ChangeQueue {
        &self.changes
    }
}
