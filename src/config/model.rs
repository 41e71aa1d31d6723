// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_SEARCH_PATTERN, HostRunState};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// poll_interval_ms = 1000
/// editor_mode_hot_reload = false
///
/// [[watch]]
/// path = "{project}/Assets"
/// filter = "*.cs"
/// include_subdirectories = true
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Directories to watch, from `[[watch]]` tables.
    #[serde(default)]
    pub watch: Vec<WatchSetupEntry>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub watch: Vec<WatchSetupEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, watch: Vec<WatchSetupEntry>) -> Self {
        Self { config, watch }
    }

    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// How often every registered directory is rescanned.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Forward changes even while the host is not running.
    #[serde(default)]
    pub editor_mode_hot_reload: bool,

    /// Run state the built-in host starts in.
    #[serde(default = "default_run_state")]
    pub run_state: HostRunState,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_run_state() -> HostRunState {
    HostRunState::Running
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            editor_mode_hot_reload: false,
            run_state: default_run_state(),
        }
    }
}

impl ConfigSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// One `[[watch]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchSetupEntry {
    /// Directory to watch; may contain path tokens such as `{project}`.
    pub path: String,

    /// File-name glob, e.g. `*.cs`.
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default = "default_include_subdirectories")]
    pub include_subdirectories: bool,
}

fn default_filter() -> String {
    DEFAULT_SEARCH_PATTERN.to_string()
}

fn default_include_subdirectories() -> bool {
    true
}

impl WatchSetupEntry {
    pub fn new(path: impl Into<String>, filter: impl Into<String>, include_subdirectories: bool) -> Self {
        Self {
            path: path.into(),
            filter: filter.into(),
            include_subdirectories,
        }
    }
}

/// Where the list of configured watch entries comes from.
pub trait WatchEntrySource: Send + Sync {
    fn setup_entries(&self) -> Vec<WatchSetupEntry>;
}

impl WatchEntrySource for ConfigFile {
    fn setup_entries(&self) -> Vec<WatchSetupEntry> {
        self.watch.clone()
    }
}

impl WatchEntrySource for Vec<WatchSetupEntry> {
    fn setup_entries(&self) -> Vec<WatchSetupEntry> {
        self.clone()
    }
}
