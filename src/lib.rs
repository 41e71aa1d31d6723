// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::engine::{FileWatcher, HotReloadHost, ReloadConsumer};
use crate::watch::PathTokens;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - path tokens (`{project}`, `{cwd}`)
/// - the built-in hot reload host
/// - registration + livewatching
/// - printing forwarded changes until Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let tokens = default_tokens(&config_root_dir(&config_path));

    if args.dry_run {
        print_dry_run(&cfg, &tokens);
        return Ok(());
    }

    let interval = match args.interval_ms {
        Some(0) => bail!("--interval-ms must be >= 1"),
        Some(ms) => Duration::from_millis(ms),
        None => cfg.poll_interval(),
    };

    let host = Arc::new(HotReloadHost::new(
        cfg.config.editor_mode_hot_reload || args.editor_mode,
        cfg.config.run_state,
    ));

    let watcher = FileWatcher::builder(host.clone())
        .source(Arc::new(cfg.clone()))
        .tokens(tokens)
        .poll_interval(interval)
        .build()?;

    for handle in watcher.initialize_file_watchers() {
        let directory = handle.directory().clone();
        match handle.wait().await {
            Ok(files) => debug!(?directory, files, "baseline ready"),
            Err(err) => warn!(?directory, error = %err, "registration failed"),
        }
    }

    watcher.try_enable_livewatching();

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                }
                break;
            }
            _ = ticker.tick() => {
                for record in host.changes().drain() {
                    println!(
                        "{} {}",
                        record.detected_at.to_rfc3339(),
                        record.file_path.display()
                    );
                }
            }
        }
    }

    info!("shutting down");
    watcher.shutdown().await;
    Ok(())
}

/// Figure out the directory `{project}` resolves to.
///
/// - If the config path has a non-empty parent (e.g. "configs/Pollwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Pollwatch.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => current_dir(),
    };
    root.canonicalize().unwrap_or(root)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Tokens available in `[[watch]].path`.
pub fn default_tokens(project_root: &Path) -> PathTokens {
    let project = project_root.to_string_lossy().into_owned();
    PathTokens::new()
        .with("{project}", move || project.clone())
        .with("{cwd}", || current_dir().to_string_lossy().into_owned())
}

/// Simple dry-run output: print config and resolved watch entries.
fn print_dry_run(cfg: &ConfigFile, tokens: &PathTokens) {
    println!("pollwatch dry-run");
    println!("  config.poll_interval_ms = {}", cfg.config.poll_interval_ms);
    println!(
        "  config.editor_mode_hot_reload = {}",
        cfg.config.editor_mode_hot_reload
    );
    println!("  config.run_state = {:?}", cfg.config.run_state);
    println!();

    println!("watch ({}):", cfg.watch.len());
    for entry in &cfg.watch {
        let resolved = tokens.resolve(&entry.path);
        println!("  - {}", entry.path);
        println!("      resolved: {}", resolved.display());
        println!("      filter: {}", entry.filter);
        println!(
            "      include_subdirectories: {}",
            entry.include_subdirectories
        );
        if !resolved.is_dir() {
            println!("      (directory does not exist)");
        }
    }

    debug!("dry-run complete (nothing watched)");
}
