// crates/test-utils/src/lib.rs

//! Shared helpers for pollwatch's integration tests.

pub mod builders;
pub mod recording_consumer;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use pollwatch::logging::LOG_ENV_VAR;

use crate::recording_consumer::RecordingConsumer;

/// Upper bound for anything a test waits on (registration, a poll pass).
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `POLLWATCH_LOG` (same variable as the binary),
/// then `RUST_LOG`, then `info`. Output is only shown for failing tests
/// unless run with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_thread_names(true)
            .init();
    });
}

/// Await `f`, failing the test if it outlives [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_DEADLINE, f)
        .await
        .expect("test deadline exceeded")
}

/// Wait until the scheduler has forwarded at least `count` changes to
/// `consumer`.
pub async fn wait_for_changes(consumer: &RecordingConsumer, count: usize) {
    with_timeout(async {
        while consumer.paths().len() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
}
