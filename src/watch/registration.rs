// src/watch/registration.rs

use std::path::PathBuf;

use anyhow::anyhow;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::{PollwatchError, Result};
use crate::watch::pattern::SearchPattern;
use crate::watch::scanner::DirectoryScanner;

/// Handle to an in-flight registration.
///
/// Dropping it does not cancel anything; registration is fire-and-forget
/// unless the caller chooses to [`wait`](Self::wait).
#[derive(Debug)]
pub struct RegistrationHandle {
    directory: PathBuf,
    handle: JoinHandle<usize>,
}

impl RegistrationHandle {
    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait until the entry is published; returns the number of files in
    /// its baseline.
    pub async fn wait(self) -> Result<usize> {
        self.handle.await.map_err(|err| {
            PollwatchError::Other(anyhow!(
                "registration of {:?} did not complete: {err}",
                self.directory
            ))
        })
    }
}

/// Adds directories to the watch store via an initial background pass.
#[derive(Debug, Clone)]
pub struct Registrar {
    scanner: DirectoryScanner,
    runtime: Handle,
}

impl Registrar {
    pub fn new(scanner: DirectoryScanner, runtime: Handle) -> Self {
        Self { scanner, runtime }
    }

    /// Register `directory` for watching.
    ///
    /// The baseline pass runs on the blocking pool while holding the store
    /// lock, then publishes the entry, replacing any previous entry for the
    /// same directory. Nothing is ever reported from a baseline pass.
    ///
    /// Only pattern compilation can fail here; everything else happens in
    /// the background.
    pub fn register(
        &self,
        directory: impl Into<PathBuf>,
        search_pattern: &str,
        include_subdirectories: bool,
    ) -> Result<RegistrationHandle> {
        let directory = directory.into();
        let pattern = SearchPattern::new(search_pattern)?;

        debug!(?directory, pattern = %pattern.as_str(), include_subdirectories, "initializing fingerprints for directory");

        let scanner = self.scanner.clone();
        let task_dir = directory.clone();
        let handle = self.runtime.spawn_blocking(move || {
            scanner.store().with_entries(|entries| {
                let entry = scanner.baseline_entry(&task_dir, pattern, include_subdirectories);
                let files = entry.fingerprints.len();
                if entries.set(entry).is_some() {
                    debug!(directory = ?task_dir, "replaced existing watch entry");
                }
                info!(directory = ?task_dir, files, "directory registered");
                files
            })
        });

        Ok(RegistrationHandle { directory, handle })
    }
}
