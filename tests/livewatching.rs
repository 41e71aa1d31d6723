mod common;
use crate::common::{init_tracing, register_and_wait, wait_for_changes, watcher_for, Scratch};

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use pollwatch::errors::PollwatchError;
use pollwatch_test_utils::recording_consumer::RecordingConsumer;

const FAST_POLL: Duration = Duration::from_millis(40);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn livewatching_picks_up_edits_on_its_own() {
    init_tracing();
    let scratch = Scratch::new();
    scratch.write("src/main.rs", "fn main() {}");
    let consumer = Arc::new(RecordingConsumer::new(true));
    let watcher = watcher_for(&consumer, FAST_POLL);

    register_and_wait(&watcher, scratch.path(), "*.rs", true).await;
    assert!(watcher.try_enable_livewatching());

    let edited = scratch.write("src/main.rs", "fn main() { println!(\"hi\"); }");
    wait_for_changes(&consumer, 1).await;
    assert_eq!(consumer.paths(), vec![edited.clone()]);

    // Several more ticks without edits add nothing.
    sleep(FAST_POLL * 5).await;
    assert_eq!(consumer.paths(), vec![edited]);

    watcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_enable_is_a_no_op() {
    init_tracing();
    let consumer = Arc::new(RecordingConsumer::new(true));
    let watcher = watcher_for(&consumer, FAST_POLL);

    assert!(watcher.try_enable_livewatching());
    assert!(!watcher.try_enable_livewatching());
    assert!(watcher.is_livewatching());

    watcher.shutdown().await;
    assert!(!watcher.is_livewatching());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ticks_without_registrations_do_nothing() {
    init_tracing();
    let consumer = Arc::new(RecordingConsumer::new(true));
    let watcher = watcher_for(&consumer, FAST_POLL);

    assert!(watcher.try_enable_livewatching());
    sleep(FAST_POLL * 3).await;
    assert_eq!(consumer.gate_checks(), 0);
    watcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stopped_scheduler_no_longer_scans_and_can_restart() {
    init_tracing();
    let scratch = Scratch::new();
    scratch.write("a.cs", "a");
    let consumer = Arc::new(RecordingConsumer::new(true));
    let watcher = watcher_for(&consumer, FAST_POLL);
    register_and_wait(&watcher, scratch.path(), "*.cs", false).await;

    assert!(watcher.try_enable_livewatching());
    watcher.shutdown().await;

    let edited = scratch.write("a.cs", "a2");
    sleep(FAST_POLL * 4).await;
    assert!(consumer.paths().is_empty());

    assert!(watcher.try_enable_livewatching());
    wait_for_changes(&consumer, 1).await;
    assert_eq!(consumer.paths(), vec![edited]);
    watcher.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn manual_update_before_registration_is_not_initialized() {
    init_tracing();
    let consumer = Arc::new(RecordingConsumer::new(true));
    let watcher = watcher_for(&consumer, FAST_POLL);

    let err = watcher.update_file_watcher().unwrap_err();
    assert!(matches!(err, PollwatchError::NotInitialized));
}
