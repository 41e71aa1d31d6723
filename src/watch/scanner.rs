// src/watch/scanner.rs

//! Rescans watched directories and reports files whose digest changed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::fs::FileSystem;
use crate::watch::digest::{Digest, compute_file_digest};
use crate::watch::enumerate::list_matching_files;
use crate::watch::pattern::SearchPattern;
use crate::watch::reporter::ChangeReporter;
use crate::watch::store::{WatchEntries, WatchEntry, WatchStore};

/// Outcome of one pass over one watched directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub directory: PathBuf,
    /// Files whose digest differs from the previous pass, in enumeration order.
    pub modified: Vec<PathBuf>,
    /// Files seen for the first time; never reported.
    pub added: Vec<PathBuf>,
    /// Previously fingerprinted files missing from this listing; never reported.
    pub deleted: Vec<PathBuf>,
    /// Listed files that could not be read; left out of the new baseline.
    pub unreadable: Vec<PathBuf>,
    /// How many of `modified` were actually forwarded to the consumer.
    pub reported: usize,
    pub elapsed: Duration,
}

impl ScanReport {
    fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Scans directories registered in a [`WatchStore`].
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    store: Arc<WatchStore>,
    fs: Arc<dyn FileSystem>,
    reporter: ChangeReporter,
}

impl DirectoryScanner {
    pub fn new(store: Arc<WatchStore>, fs: Arc<dyn FileSystem>, reporter: ChangeReporter) -> Self {
        Self { store, fs, reporter }
    }

    pub fn store(&self) -> &Arc<WatchStore> {
        &self.store
    }

    /// Rescan one registered directory.
    ///
    /// Returns `None` if `directory` has no entry yet (e.g. its registration
    /// is still in flight). The store lock is held for the whole pass.
    pub fn scan(&self, directory: &Path) -> Option<ScanReport> {
        self.store
            .with_entries(|entries| self.scan_locked(entries, directory))
    }

    /// Rescan every registered directory, one after the other.
    ///
    /// Each directory is its own pass; a registration may slip in between two
    /// passes but never into one.
    pub fn scan_all(&self) -> Vec<ScanReport> {
        let directories = self.store.directories();
        let mut reports = Vec::with_capacity(directories.len());
        for directory in directories {
            if let Some(report) = self.scan(&directory) {
                reports.push(report);
            }
        }
        reports
    }

    /// Fingerprint a directory from scratch, without comparing or reporting.
    ///
    /// Used by registration to build the initial baseline.
    pub fn baseline_entry(
        &self,
        directory: &Path,
        search_pattern: SearchPattern,
        include_subdirectories: bool,
    ) -> WatchEntry {
        let started = Instant::now();
        let files = self.enumerate(directory, &search_pattern, include_subdirectories);

        let mut fingerprints = BTreeMap::new();
        for path in files {
            if let Some(digest) = self.digest_or_warn(&path) {
                fingerprints.insert(path, digest);
            }
        }

        debug!(
            ?directory,
            files = fingerprints.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built baseline fingerprints"
        );
        WatchEntry::new(directory, search_pattern, include_subdirectories, fingerprints)
    }

    fn scan_locked(&self, entries: &mut WatchEntries, directory: &Path) -> Option<ScanReport> {
        let started = Instant::now();

        let Some(entry) = entries.get_mut(directory) else {
            debug!(?directory, "no watch entry yet; skipping scan");
            return None;
        };

        let mut report = ScanReport::new(directory);

        // 1) The authoritative current file set.
        let files = self.enumerate(
            entry.directory(),
            entry.search_pattern(),
            entry.include_subdirectories(),
        );
        let listed_in = started.elapsed();

        // 2) Deletions are detected, logged and otherwise ignored.
        for known in entry.fingerprints.keys() {
            if files.binary_search(known).is_err() {
                debug!(path = ?known, "file deleted");
                report.deleted.push(known.clone());
            }
        }

        // 3) Classify every listed file against the previous digests, and
        // 4) collect this pass's digests as the next baseline.
        let compare_started = Instant::now();
        let mut fresh = BTreeMap::new();
        for path in files {
            let Some(digest) = self.digest_or_warn(&path) else {
                report.unreadable.push(path);
                continue;
            };

            match entry.fingerprints.get(&path) {
                None => {
                    debug!(?path, "new file");
                    report.added.push(path.clone());
                }
                Some(previous) if *previous != digest => {
                    debug!(?path, "file changed");
                    if self.reporter.report(&path) {
                        report.reported += 1;
                    }
                    report.modified.push(path.clone());
                }
                Some(_) => {}
            }

            fresh.insert(path, digest);
        }

        entry.fingerprints = fresh;
        report.elapsed = started.elapsed();

        debug!(
            ?directory,
            list_ms = listed_in.as_millis() as u64,
            compare_ms = compare_started.elapsed().as_millis() as u64,
            total_ms = report.elapsed.as_millis() as u64,
            "scan timings"
        );

        if !report.is_quiet() {
            info!(
                ?directory,
                modified = report.modified.len(),
                reported = report.reported,
                added = report.added.len(),
                deleted = report.deleted.len(),
                "scan detected changes"
            );
        }

        Some(report)
    }

    /// List matching files; a missing or unreadable root yields an empty set.
    fn enumerate(
        &self,
        directory: &Path,
        pattern: &SearchPattern,
        include_subdirectories: bool,
    ) -> Vec<PathBuf> {
        match list_matching_files(self.fs.as_ref(), directory, pattern, include_subdirectories) {
            Ok(files) => files,
            Err(err) => {
                warn!(?directory, error = %err, "cannot list watched directory; treating it as empty");
                Vec::new()
            }
        }
    }

    fn digest_or_warn(&self, path: &Path) -> Option<Digest> {
        match compute_file_digest(self.fs.as_ref(), path) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(?path, error = %err, "could not read file; leaving it out of this pass");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::host::{HotReloadHost, ReloadConsumer};
    use crate::fs::mock::MockFileSystem;
    use crate::types::HostRunState;

    fn setup() -> (MockFileSystem, Arc<HotReloadHost>, DirectoryScanner) {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.cs", "a1");
        fs.add_file("/proj/b.cs", "b1");
        let host = Arc::new(HotReloadHost::new(false, HostRunState::Running));
        let scanner = DirectoryScanner::new(
            Arc::new(WatchStore::new()),
            Arc::new(fs.clone()),
            ChangeReporter::new(host.clone()),
        );
        let entry = scanner.baseline_entry(Path::new("/proj"), SearchPattern::new("*.cs").unwrap(), false);
        scanner.store().set(entry);
        (fs, host, scanner)
    }

    #[test]
    fn unknown_directory_is_skipped() {
        let (_fs, _host, scanner) = setup();
        assert!(scanner.scan(Path::new("/other")).is_none());
    }

    #[test]
    fn modification_is_reported_once_then_stabilizes() {
        let (fs, host, scanner) = setup();
        fs.add_file("/proj/a.cs", "a2");

        let first = scanner.scan(Path::new("/proj")).unwrap();
        assert_eq!(first.modified, vec![PathBuf::from("/proj/a.cs")]);
        assert_eq!(first.reported, 1);

        let second = scanner.scan(Path::new("/proj")).unwrap();
        assert!(second.is_quiet());
        assert_eq!(host.changes().len(), 1);
    }

    #[test]
    fn deletion_is_detected_but_not_reported() {
        let (fs, host, scanner) = setup();
        fs.remove_file("/proj/b.cs");

        let report = scanner.scan(Path::new("/proj")).unwrap();
        assert_eq!(report.deleted, vec![PathBuf::from("/proj/b.cs")]);
        assert!(host.changes().is_empty());

        let entry = scanner.store().get(Path::new("/proj")).unwrap();
        assert!(!entry.fingerprints.contains_key(Path::new("/proj/b.cs")));
    }

    #[test]
    fn unreadable_file_drops_out_of_baseline_without_aborting() {
        let (fs, host, scanner) = setup();
        fs.add_file("/proj/b.cs", "b2");
        fs.set_unreadable("/proj/a.cs", true);

        let report = scanner.scan(Path::new("/proj")).unwrap();
        assert_eq!(report.unreadable, vec![PathBuf::from("/proj/a.cs")]);
        assert_eq!(report.modified, vec![PathBuf::from("/proj/b.cs")]);
        assert_eq!(host.changes().len(), 1);

        let entry = scanner.store().get(Path::new("/proj")).unwrap();
        assert_eq!(entry.fingerprints.len(), 1);

        // Readable again: it comes back as a new file, not as a change.
        fs.set_unreadable("/proj/a.cs", false);
        let report = scanner.scan(Path::new("/proj")).unwrap();
        assert_eq!(report.added, vec![PathBuf::from("/proj/a.cs")]);
        assert_eq!(host.changes().len(), 1);
    }
}
