// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PollwatchError, Result};
use crate::watch::SearchPattern;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.watch))
    }
}

pub fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_watch_entries(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.poll_interval_ms == 0 {
        return Err(PollwatchError::ConfigError(
            "[config].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch_entries(cfg: &RawConfigFile) -> Result<()> {
    for (idx, entry) in cfg.watch.iter().enumerate() {
        if entry.path.trim().is_empty() {
            return Err(PollwatchError::ConfigError(format!(
                "[[watch]] entry #{} has an empty `path`",
                idx + 1
            )));
        }
        SearchPattern::new(&entry.filter).map_err(|err| match err {
            PollwatchError::ConfigError(msg) => PollwatchError::ConfigError(format!(
                "[[watch]] entry for '{}': {}",
                entry.path, msg
            )),
            other => other,
        })?;
    }
    Ok(())
}
