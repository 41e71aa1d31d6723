// src/watch/reporter.rs

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::engine::host::{ChangeRecord, ReloadConsumer};

/// Gate + sink between the scanner and the reload consumer.
///
/// The gate is evaluated when a change is reported. A change dropped while
/// the consumer is not eligible is gone for good; it is not retried on a
/// later scan because that scan's baseline already contains the new digest.
#[derive(Clone)]
pub struct ChangeReporter {
    consumer: Arc<dyn ReloadConsumer>,
}

impl std::fmt::Debug for ChangeReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeReporter").finish_non_exhaustive()
    }
}

impl ChangeReporter {
    pub fn new(consumer: Arc<dyn ReloadConsumer>) -> Self {
        Self { consumer }
    }

    /// Forward a modified file to the consumer if hot reload is eligible.
    ///
    /// Returns `true` if a record was appended.
    pub fn report(&self, path: &Path) -> bool {
        if !self.consumer.hot_reload_eligible() {
            debug!(
                ?path,
                "hot reload not eligible; change won't be compiled and hot reloaded"
            );
            return false;
        }

        self.consumer
            .changes()
            .append(ChangeRecord::new(path, Utc::now()));
        debug!(?path, "change forwarded to reload consumer");
        true
    }
}
