use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use pollwatch::engine::{ChangeQueue, ReloadConsumer};

/// A reload consumer for tests that:
/// - lets the test flip eligibility directly
/// - counts how often the gate was consulted
/// - exposes the queued paths without draining them.
#[derive(Debug, Default)]
pub struct RecordingConsumer {
    eligible: AtomicBool,
    gate_checks: AtomicUsize,
    changes: ChangeQueue,
}

impl RecordingConsumer {
    pub fn new(eligible: bool) -> Self {
        Self {
            eligible: AtomicBool::new(eligible),
            gate_checks: AtomicUsize::new(0),
            changes: ChangeQueue::new(),
        }
    }

    pub fn set_eligible(&self, eligible: bool) {
        self.eligible.store(eligible, Ordering::SeqCst);
    }

    pub fn gate_checks(&self) -> usize {
        self.gate_checks.load(Ordering::SeqCst)
    }

    /// Paths queued so far, in append order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.changes
            .snapshot()
            .into_iter()
            .map(|record| record.file_path)
            .collect()
    }
}

impl ReloadConsumer for RecordingConsumer {
    fn hot_reload_eligible(&self) -> bool {
        self.gate_checks.fetch_add(1, Ordering::SeqCst);
        self.eligible.load(Ordering::SeqCst)
    }

    fn changes(&self) -> &ChangeQueue {
        &self.changes
    }
}
