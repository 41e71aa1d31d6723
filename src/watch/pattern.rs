// src/watch/pattern.rs

use std::fmt;
use std::path::Path;

use globset::{Glob, GlobMatcher};

use crate::errors::{PollwatchError, Result};
use crate::types::DEFAULT_SEARCH_PATTERN;

/// Compiled file-name filter for a watch entry, e.g. `*.cs` or `*.rs`.
///
/// The pattern is matched against the file *name* only, never against the
/// directory part, so `*.rs` matches `src/a/b.rs` when recursion is enabled.
#[derive(Clone)]
pub struct SearchPattern {
    raw: String,
    matcher: GlobMatcher,
}

impl fmt::Debug for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchPattern").field(&self.raw).finish()
    }
}

impl SearchPattern {
    /// Compile a pattern. An empty/blank pattern means "every file".
    pub fn new(pattern: &str) -> Result<Self> {
        let raw = match pattern.trim() {
            "" => DEFAULT_SEARCH_PATTERN.to_string(),
            p => p.to_string(),
        };
        let glob = Glob::new(&raw).map_err(|e| {
            PollwatchError::ConfigError(format!("invalid search pattern '{raw}': {e}"))
        })?;
        Ok(Self {
            raw,
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the file name of `path` matches this pattern.
    pub fn matches(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.matcher.is_match(Path::new(name)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_pattern_matches_file_names_only() {
        let p = SearchPattern::new("*.cs").unwrap();
        assert!(p.matches(Path::new("/proj/Assets/Player.cs")));
        assert!(p.matches(Path::new("/proj/deep/nested/dir/Enemy.cs")));
        assert!(!p.matches(Path::new("/proj/Assets/Player.cs.meta")));
        assert!(!p.matches(Path::new("/proj/cs/readme.txt")));
    }

    #[test]
    fn blank_pattern_matches_everything() {
        let p = SearchPattern::new("  ").unwrap();
        assert_eq!(p.as_str(), "*");
        assert!(p.matches(Path::new("/x/anything.bin")));
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let err = SearchPattern::new("[*.cs").unwrap_err();
        assert!(matches!(err, PollwatchError::ConfigError(msg) if msg.contains("[*.cs")));
    }
}
