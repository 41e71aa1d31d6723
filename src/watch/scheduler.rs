// src/watch/scheduler.rs

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::watch::scanner::DirectoryScanner;

/// Internal handle for the running poll loop.
///
/// - `shutdown` tells the loop to stop after its current pass. Dropping it
///   has the same effect, so a scheduler that is dropped without `stop()`
///   still winds its loop down.
/// - `handle` is the Tokio task running the loop.
#[derive(Debug)]
struct PollLoop {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Single periodic task that rescans every registered directory.
#[derive(Debug)]
pub struct PollingScheduler {
    scanner: DirectoryScanner,
    period: Duration,
    runtime: Handle,
    active: Mutex<Option<PollLoop>>,
}

impl PollingScheduler {
    pub fn new(scanner: DirectoryScanner, period: Duration, runtime: Handle) -> Self {
        Self {
            scanner,
            period,
            runtime,
            active: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn active(&self) -> MutexGuard<'_, Option<PollLoop>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.active()
            .as_ref()
            .is_some_and(|running| !running.handle.is_finished())
    }

    /// Start polling. Returns `false` (and warns) if already running.
    pub fn start(&self) -> bool {
        let mut active = self.active();
        if let Some(running) = active.as_ref() {
            if !running.handle.is_finished() {
                warn!("livewatcher is already running");
                return false;
            }
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = self
            .runtime
            .spawn(poll_loop(self.scanner.clone(), self.period, shutdown_rx));
        *active = Some(PollLoop { shutdown, handle });

        info!(period_ms = self.period.as_millis() as u64, "livewatching started");
        true
    }

    /// Stop polling and wait for the loop to exit.
    ///
    /// A pass that is already running is allowed to finish. Returns `false`
    /// if nothing was running.
    pub async fn stop(&self) -> bool {
        let Some(running) = self.active().take() else {
            return false;
        };

        let _ = running.shutdown.send(true);
        if let Err(err) = running.handle.await {
            error!(error = %err, "poll loop ended abnormally");
        }
        info!("livewatching stopped");
        true
    }
}

async fn poll_loop(
    scanner: DirectoryScanner,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    // A slow pass delays the next one instead of causing a burst.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        if scanner.store().is_empty() {
            continue;
        }

        let pass = scanner.clone();
        match tokio::task::spawn_blocking(move || pass.scan_all()).await {
            Ok(reports) => {
                let reported: usize = reports.iter().map(|r| r.reported).sum();
                debug!(directories = reports.len(), reported, "poll pass finished");
            }
            Err(err) => error!(error = %err, "poll pass panicked"),
        }
    }

    debug!("poll loop finished");
}
