// src/engine/file_watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::config::{WatchEntrySource, WatchSetupEntry};
use crate::engine::host::ReloadConsumer;
use crate::errors::{PollwatchError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::DEFAULT_POLL_INTERVAL_MS;
use crate::watch::{
    ChangeReporter, DirectoryScanner, PathTokens, PollingScheduler, Registrar,
    RegistrationHandle, ScanReport, WatchStore,
};

/// The host-facing command surface.
///
/// Owns the watch store and every component that touches it:
/// - [`initialize_file_watchers`](Self::initialize_file_watchers) registers
///   every configured entry,
/// - [`update_file_watcher`](Self::update_file_watcher) forces a full scan,
/// - [`try_enable_livewatching`](Self::try_enable_livewatching) starts
///   periodic polling,
/// - [`shutdown`](Self::shutdown) stops it again.
pub struct FileWatcher {
    store: Arc<WatchStore>,
    scanner: DirectoryScanner,
    registrar: Registrar,
    scheduler: PollingScheduler,
    source: Arc<dyn WatchEntrySource>,
    tokens: PathTokens,
    fs: Arc<dyn FileSystem>,
}

impl fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileWatcher")
            .field("directories", &self.store.len())
            .field("tokens", &self.tokens)
            .field("poll_interval", &self.scheduler.period())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    pub fn builder(consumer: Arc<dyn ReloadConsumer>) -> FileWatcherBuilder {
        FileWatcherBuilder::new(consumer)
    }

    pub fn store(&self) -> &Arc<WatchStore> {
        &self.store
    }

    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    /// Register a single directory (asynchronous, see [`Registrar::register`]).
    pub fn register(
        &self,
        directory: impl Into<PathBuf>,
        search_pattern: &str,
        include_subdirectories: bool,
    ) -> Result<RegistrationHandle> {
        self.registrar
            .register(directory, search_pattern, include_subdirectories)
    }

    /// Substitute path tokens in a configured path and check that it exists.
    ///
    /// A missing directory is only logged: it is still registered and simply
    /// scans as empty until it appears.
    pub fn resolve_setup_path(&self, entry: &WatchSetupEntry) -> PathBuf {
        let directory = self.tokens.resolve(&entry.path);
        if !self.fs.is_dir(&directory) {
            warn!(
                ?directory,
                configured = %entry.path,
                "watched directory does not exist; make sure the file-watcher setup is correct"
            );
        }
        directory
    }

    /// Register every entry from the configured source.
    ///
    /// Entries with an invalid filter are logged and skipped. The returned
    /// handles may be awaited or ignored.
    pub fn initialize_file_watchers(&self) -> Vec<RegistrationHandle> {
        let entries = self.source.setup_entries();
        let mut handles = Vec::with_capacity(entries.len());

        for entry in &entries {
            let directory = self.resolve_setup_path(entry);
            match self.register(directory, &entry.filter, entry.include_subdirectories) {
                Ok(handle) => handles.push(handle),
                Err(err) => error!(path = %entry.path, error = %err, "cannot register watch entry"),
            }
        }

        info!(configured = entries.len(), registering = handles.len(), "initializing file watchers");
        handles
    }

    /// Scan every registered directory now, on the calling thread.
    ///
    /// Fails with `NotInitialized` if nothing has been registered yet. The
    /// call blocks while files are hashed and may wait behind a running poll
    /// pass; for large trees on a current-thread runtime, prefer
    /// `spawn_blocking`.
    pub fn update_file_watcher(&self) -> Result<Vec<ScanReport>> {
        if self.store.is_empty() {
            error!("file watcher has not been initialized yet; please initialize first");
            return Err(PollwatchError::NotInitialized);
        }
        Ok(self.scanner.scan_all())
    }

    /// Scan one registered directory now; `None` if it is not registered.
    pub fn scan_directory(&self, directory: &Path) -> Option<ScanReport> {
        self.scanner.scan(directory)
    }

    /// Start periodic polling. A second call warns and does nothing.
    pub fn try_enable_livewatching(&self) -> bool {
        self.scheduler.start()
    }

    pub fn is_livewatching(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Stop periodic polling, waiting for an in-flight pass to finish.
    pub async fn shutdown(&self) {
        self.scheduler.stop().await;
    }
}

/// Builder for [`FileWatcher`].
pub struct FileWatcherBuilder {
    consumer: Arc<dyn ReloadConsumer>,
    source: Arc<dyn WatchEntrySource>,
    tokens: PathTokens,
    fs: Arc<dyn FileSystem>,
    poll_interval: Duration,
    runtime: Option<Handle>,
}

impl FileWatcherBuilder {
    pub fn new(consumer: Arc<dyn ReloadConsumer>) -> Self {
        Self {
            consumer,
            source: Arc::new(Vec::<WatchSetupEntry>::new()),
            tokens: PathTokens::new(),
            fs: Arc::new(RealFileSystem),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            runtime: None,
        }
    }

    pub fn source(mut self, source: Arc<dyn WatchEntrySource>) -> Self {
        self.source = source;
        self
    }

    pub fn tokens(mut self, tokens: PathTokens) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Runtime used for registration and polling. Defaults to the runtime
    /// `build` is called from.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<FileWatcher> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current()?,
        };

        let store = Arc::new(WatchStore::new());
        let reporter = ChangeReporter::new(self.consumer);
        let scanner = DirectoryScanner::new(Arc::clone(&store), Arc::clone(&self.fs), reporter);
        let registrar = Registrar::new(scanner.clone(), runtime.clone());
        let scheduler = PollingScheduler::new(scanner.clone(), self.poll_interval, runtime);

        Ok(FileWatcher {
            store,
            scanner,
            registrar,
            scheduler,
            source: self.source,
            tokens: self.tokens,
            fs: self.fs,
        })
    }
}

