// src/watch/enumerate.rs

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::watch::pattern::SearchPattern;

/// Collect all files under `directory` whose name matches `pattern`.
///
/// - Only the top level is listed unless `include_subdirectories` is set.
/// - Symlinked directories are never descended into, so a link back to an
///   ancestor cannot make the walk revisit the tree. Symlinked files are
///   listed like any other file.
/// - The result is sorted so that scans report changes in a stable order.
/// - A missing `directory` is a `ConfigError`; an unreadable subdirectory is
///   logged and skipped so the rest of the tree is still listed.
pub fn list_matching_files(
    fs: &dyn FileSystem,
    directory: &Path,
    pattern: &SearchPattern,
    include_subdirectories: bool,
) -> Result<Vec<PathBuf>> {
    if !fs.is_dir(directory) {
        return Err(PollwatchError::ConfigError(format!(
            "watched directory {:?} does not exist",
            directory
        )));
    }

    let mut files = Vec::new();
    let mut stack = vec![directory.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == directory => return Err(err.into()),
            Err(err) => {
                warn!(dir = ?dir, error = %err, "skipping unreadable subdirectory");
                continue;
            }
        };

        for path in entries {
            if fs.is_dir(&path) {
                if !include_subdirectories {
                    continue;
                }
                if fs.is_symlink(&path) {
                    debug!(?path, "not descending into symlinked directory");
                    continue;
                }
                stack.push(path);
            } else if fs.is_file(&path) && pattern.matches(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    debug!(?directory, count = files.len(), "enumerated matching files");
    Ok(files)
}
