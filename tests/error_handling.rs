mod common;
use crate::common::{init_tracing, with_timeout};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use pollwatch::engine::{FileWatcher, HotReloadHost, ReloadConsumer};
use pollwatch::errors::PollwatchError;
use pollwatch::fs::mock::MockFileSystem;
use pollwatch::types::HostRunState;

fn mock_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/game/Assets/Player.cs", "class Player {}");
    fs.add_file("/game/Assets/Enemy.cs", "class Enemy {}");
    fs.add_file("/tools/gen.cs", "class Gen {}");
    fs
}

fn watcher_over(fs: &MockFileSystem, host: &Arc<HotReloadHost>) -> FileWatcher {
    FileWatcher::builder(host.clone())
        .file_system(Arc::new(fs.clone()))
        .poll_interval(Duration::from_secs(3600))
        .build()
        .unwrap()
}

async fn register(watcher: &FileWatcher, dir: &str) -> usize {
    let handle = watcher.register(dir, "*.cs", true).unwrap();
    with_timeout(handle.wait()).await.unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreadable_file_does_not_stop_the_pass_or_other_directories() {
    init_tracing();
    let fs = mock_project();
    let host = Arc::new(HotReloadHost::new(false, HostRunState::Running));
    let watcher = watcher_over(&fs, &host);
    register(&watcher, "/game/Assets").await;
    register(&watcher, "/tools").await;

    fs.set_unreadable("/game/Assets/Enemy.cs", true);
    fs.add_file("/game/Assets/Player.cs", "class Player { int hp; }");
    fs.add_file("/tools/gen.cs", "class Gen { edited }");

    let mut reports = watcher.update_file_watcher().unwrap();
    reports.sort_by(|a, b| a.directory.cmp(&b.directory));

    assert_eq!(reports[0].unreadable, vec![PathBuf::from("/game/Assets/Enemy.cs")]);
    assert_eq!(reports[0].modified, vec![PathBuf::from("/game/Assets/Player.cs")]);
    assert_eq!(reports[1].modified, vec![PathBuf::from("/tools/gen.cs")]);

    let mut forwarded: Vec<PathBuf> = host
        .changes()
        .drain()
        .into_iter()
        .map(|r| r.file_path)
        .collect();
    forwarded.sort();
    assert_eq!(
        forwarded,
        vec![
            PathBuf::from("/game/Assets/Player.cs"),
            PathBuf::from("/tools/gen.cs"),
        ]
    );

    let entry = watcher.store().get(Path::new("/game/Assets")).unwrap();
    assert!(!entry.fingerprints.contains_key(Path::new("/game/Assets/Enemy.cs")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn removed_file_is_dropped_from_the_baseline_silently() {
    init_tracing();
    let fs = mock_project();
    let host = Arc::new(HotReloadHost::new(false, HostRunState::Running));
    let watcher = watcher_over(&fs, &host);
    assert_eq!(register(&watcher, "/tools").await, 1);

    fs.remove_file("/tools/gen.cs");
    let reports = watcher.update_file_watcher().unwrap();
    assert_eq!(reports[0].deleted, vec![PathBuf::from("/tools/gen.cs")]);
    assert!(host.changes().is_empty());
    assert!(watcher.store().get(Path::new("/tools")).unwrap().fingerprints.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn host_state_gates_forwarding() {
    init_tracing();
    let fs = mock_project();
    let host = Arc::new(HotReloadHost::new(false, HostRunState::Editing));
    let watcher = watcher_over(&fs, &host);
    register(&watcher, "/tools").await;

    fs.add_file("/tools/gen.cs", "v2");
    watcher.update_file_watcher().unwrap();
    assert!(host.changes().is_empty());

    host.set_editor_mode_hot_reload(true);
    fs.add_file("/tools/gen.cs", "v3");
    watcher.update_file_watcher().unwrap();
    assert_eq!(host.changes().len(), 1);

    host.set_editor_mode_hot_reload(false);
    host.set_run_state(HostRunState::Running);
    fs.add_file("/tools/gen.cs", "v4");
    watcher.update_file_watcher().unwrap();
    assert_eq!(host.changes().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn manual_update_with_nothing_registered_is_reported_not_fatal() {
    init_tracing();
    let fs = mock_project();
    let host = Arc::new(HotReloadHost::default());
    let watcher = watcher_over(&fs, &host);

    assert!(matches!(
        watcher.update_file_watcher(),
        Err(PollwatchError::NotInitialized)
    ));

    // The watcher is still usable afterwards.
    register(&watcher, "/tools").await;
    assert!(watcher.update_file_watcher().is_ok());
}

#[test]
fn building_outside_a_runtime_is_an_error() {
    let host = Arc::new(HotReloadHost::default());
    let result = FileWatcher::builder(host).build();
    assert!(matches!(result, Err(PollwatchError::Runtime(_))));
}
