// src/engine/mod.rs

//! Host-facing side of pollwatch.
//!
//! - [`host`] defines what a reload consumer provides (eligibility + change
//!   queue) and a ready-made implementation.
//! - [`file_watcher`] wires the store, scanner, registrar, scheduler and
//!   reporter together behind the host commands.

pub mod file_watcher;
pub mod host;

pub use file_watcher::{FileWatcher, FileWatcherBuilder};
pub use host::{ChangeQueue, ChangeRecord, HotReloadHost, ReloadConsumer};
pub use crate::types::HostRunState;
