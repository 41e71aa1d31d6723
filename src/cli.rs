// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll directories for content changes and report modified files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Pollwatch.toml")]
    pub config: String,

    /// Override `[config].poll_interval_ms`.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Report changes even while the host is not running.
    #[arg(long)]
    pub editor_mode: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print resolved watch entries, but don't watch.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides_parse() {
        let args = CliArgs::parse_from(["pollwatch"]);
        assert_eq!(args.config, "Pollwatch.toml");
        assert!(args.interval_ms.is_none());
        assert!(!args.editor_mode);

        let args = CliArgs::parse_from([
            "pollwatch",
            "--config",
            "demo.toml",
            "--interval-ms",
            "250",
            "--editor-mode",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.config, "demo.toml");
        assert_eq!(args.interval_ms, Some(250));
        assert!(args.editor_mode);
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
