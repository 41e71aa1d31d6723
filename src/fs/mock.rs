// src/fs/mock.rs

use super::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    Symlink(PathBuf),
}

/// Link hops followed before a lookup gives up (mirrors ELOOP).
const MAX_LINK_HOPS: usize = 16;

/// In-memory filesystem for tests.
///
/// Besides plain files and directories it can simulate files that are listed
/// by `read_dir` but refuse to be opened (locked, permission denied), which
/// is the window a real scan hits when a file changes mid-pass.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    unreadable: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("/"), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            unreadable: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create or overwrite a file, creating parent directories as needed.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(path.clone(), MockEntry::File(content.into()));

        if let Some(parent) = path.parent() {
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, &path);
        }
    }

    /// Create an (empty) directory and its parents.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.entries();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Remove a file and unlink it from its parent directory.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut files = self.entries();
        if files.remove(path).is_none() {
            return;
        }
        let name = path.file_name().and_then(|n| n.to_str());
        if let (Some(parent), Some(name)) = (path.parent(), name) {
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                children.retain(|c| c != name);
            }
        }
    }

    /// Create a symbolic link at `link` pointing to `target`.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = link.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(link.clone(), MockEntry::Symlink(target.as_ref().to_path_buf()));

        if let Some(parent) = link.parent() {
            Self::ensure_dir_entry(&mut files, parent);
            Self::link_child(&mut files, parent, &link);
        }
    }

    /// Make `open_read` fail for `path` while keeping it visible in listings.
    pub fn set_unreadable(&self, path: impl AsRef<Path>, unreadable: bool) {
        let mut set = self
            .unreadable
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if unreadable {
            set.insert(path.as_ref().to_path_buf());
        } else {
            set.remove(path.as_ref());
        }
    }

    fn is_unreadable(&self, path: &Path) -> bool {
        self.unreadable
            .lock()
            .map(|set| set.contains(path))
            .unwrap_or(false)
    }

    /// Look up `path`, following symlinks. Only the final component is
    /// resolved; links in the middle of a path are not.
    fn resolve<'a>(files: &'a HashMap<PathBuf, MockEntry>, path: &Path) -> Option<&'a MockEntry> {
        let mut entry = files.get(path)?;
        for _ in 0..MAX_LINK_HOPS {
            match entry {
                MockEntry::Symlink(target) => entry = files.get(target)?,
                other => return Some(other),
            }
        }
        None
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if let Some(parent) = path.parent() {
            if parent != path && !parent.as_os_str().is_empty() {
                Self::ensure_dir_entry(files, parent);
                Self::link_child(files, parent, path);
            }
        }
    }

    fn link_child(files: &mut HashMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }
}

impl FileSystem for MockFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        if self.is_unreadable(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("file is locked: {}", path.display()),
            ));
        }
        let files = self.entries();
        match Self::resolve(&files, path) {
            Some(MockEntry::File(content)) => Ok(Box::new(Cursor::new(content.clone()))),
            Some(MockEntry::Dir(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path.display()),
            )),
            Some(MockEntry::Symlink(_)) | None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(Self::resolve(&self.entries(), path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(Self::resolve(&self.entries(), path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::Symlink(_)))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let files = self.entries();
        match Self::resolve(&files, path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory or not found: {}", path.display()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_files_create_parent_directories() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/src/a/b.rs", "x");

        assert!(fs.is_dir(Path::new("/proj")));
        assert!(fs.is_dir(Path::new("/proj/src/a")));
        assert_eq!(
            fs.read_dir(Path::new("/proj/src")).unwrap(),
            vec![PathBuf::from("/proj/src/a")]
        );
    }

    #[test]
    fn unreadable_files_stay_listed_but_fail_to_open() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/locked.rs", "x");
        fs.set_unreadable("/proj/locked.rs", true);

        assert!(fs.is_file(Path::new("/proj/locked.rs")));
        let err = fs.open_read(Path::new("/proj/locked.rs")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        fs.set_unreadable("/proj/locked.rs", false);
        assert!(fs.open_read(Path::new("/proj/locked.rs")).is_ok());
    }

    #[test]
    fn removed_files_disappear_from_listing() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.rs", "a");
        fs.add_file("/proj/b.rs", "b");
        fs.remove_file("/proj/a.rs");

        assert!(!fs.is_file(Path::new("/proj/a.rs")));
        assert_eq!(
            fs.read_dir(Path::new("/proj")).unwrap(),
            vec![PathBuf::from("/proj/b.rs")]
        );
    }

    #[test]
    fn symlinks_resolve_but_report_themselves() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/src/a.rs", "a");
        fs.add_symlink("/proj/src/loop", "/proj");

        assert!(fs.is_symlink(Path::new("/proj/src/loop")));
        assert!(!fs.is_symlink(Path::new("/proj/src")));
        assert!(fs.is_dir(Path::new("/proj/src/loop")));
        assert_eq!(
            fs.read_dir(Path::new("/proj/src/loop")).unwrap(),
            vec![PathBuf::from("/proj/src/loop/src")]
        );
    }
}
