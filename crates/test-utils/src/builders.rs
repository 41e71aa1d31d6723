#![allow(dead_code)]

use pollwatch::config::{ConfigFile, ConfigSection, RawConfigFile, WatchSetupEntry};
use pollwatch::types::HostRunState;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                watch: Vec::new(),
            },
        }
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.config.poll_interval_ms = ms;
        self
    }

    pub fn editor_mode_hot_reload(mut self, enabled: bool) -> Self {
        self.config.config.editor_mode_hot_reload = enabled;
        self
    }

    pub fn run_state(mut self, state: HostRunState) -> Self {
        self.config.config.run_state = state;
        self
    }

    pub fn with_watch(mut self, entry: WatchSetupEntry) -> Self {
        self.config.watch.push(entry);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `WatchSetupEntry`.
pub struct WatchEntryBuilder {
    entry: WatchSetupEntry,
}

impl WatchEntryBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            entry: WatchSetupEntry::new(path, "*", true),
        }
    }

    pub fn filter(mut self, pattern: &str) -> Self {
        self.entry.filter = pattern.to_string();
        self
    }

    pub fn top_level_only(mut self) -> Self {
        self.entry.include_subdirectories = false;
        self
    }

    pub fn build(self) -> WatchSetupEntry {
        self.entry
    }
}
