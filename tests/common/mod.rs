#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::{tempdir, TempDir};

use pollwatch::engine::FileWatcher;
use pollwatch_test_utils::recording_consumer::RecordingConsumer;

pub use pollwatch_test_utils::{init_tracing, wait_for_changes, with_timeout};

/// A temporary directory tree that tests write source files into.
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write (or overwrite) `rel` with `content`, creating parent dirs.
    ///
    /// The content is written next to the target and renamed into place, so
    /// a concurrently running scan never sees a half-written file.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        let parent = path.parent().expect("file has a parent");
        fs::create_dir_all(parent).expect("create parent dirs");

        let name = path.file_name().expect("file name").to_string_lossy();
        let staging = parent.join(format!(".{name}.partial"));
        fs::write(&staging, content).expect("write staging file");
        fs::rename(&staging, &path).expect("move file into place");
        path
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.join(rel)).expect("remove file");
    }
}

/// Watcher over the real filesystem reporting into `consumer`.
pub fn watcher_for(consumer: &Arc<RecordingConsumer>, poll_interval: Duration) -> FileWatcher {
    FileWatcher::builder(consumer.clone())
        .poll_interval(poll_interval)
        .build()
        .expect("build watcher inside a Tokio runtime")
}

/// Register `dir` and wait for its baseline to be published.
pub async fn register_and_wait(
    watcher: &FileWatcher,
    dir: &Path,
    pattern: &str,
    include_subdirectories: bool,
) -> usize {
    let handle = watcher
        .register(dir, pattern, include_subdirectories)
        .expect("valid pattern");
    with_timeout(handle.wait())
        .await
        .expect("registration completes")
}
