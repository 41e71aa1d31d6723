// src/watch/mod.rs

//! Polling-based change detection.
//!
//! This module is responsible for:
//! - Fingerprinting files with BLAKE3 (`digest`).
//! - Listing the files a watch entry covers (`pattern`, `enumerate`).
//! - Holding the per-directory fingerprints behind one lock (`store`).
//! - Comparing fresh fingerprints against the stored ones (`scanner`).
//! - Registering directories and polling them periodically
//!   (`registration`, `scheduler`).
//! - Handing modified files to the reload consumer (`reporter`).
//!
//! It does **not** use OS change notifications; every pass reads the files.

pub mod digest;
pub mod enumerate;
pub mod pattern;
pub mod registration;
pub mod reporter;
pub mod scanner;
pub mod scheduler;
pub mod store;
pub mod tokens;

pub use digest::{compute_file_digest, Digest};
pub use pattern::SearchPattern;
pub use registration::{Registrar, RegistrationHandle};
pub use reporter::ChangeReporter;
pub use scanner::{DirectoryScanner, ScanReport};
pub use scheduler::PollingScheduler;
pub use store::{WatchEntries, WatchEntry, WatchStore};
pub use tokens::PathTokens;
