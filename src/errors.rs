// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("File watcher has not been initialized yet; register at least one directory first")]
    NotInitialized,

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("no Tokio runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PollwatchError>;
