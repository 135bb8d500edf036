pub mod builders;
pub mod fake_supervisor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use remon::engine::ReactorEvent;
use remon::logging::LOG_ENV;

static INIT: Once = Once::new();

/// Upper bound for anything a test awaits: process exits, watcher batches,
/// signals.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialise tracing once per test binary.
///
/// Reads the same `REMON_LOG` directives as the binary (for example
/// `REMON_LOG=remon::engine=debug`) and writes through the test writer, so
/// output only shows up for failing tests or with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Await `f`, failing the test after [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Next event the reactor would see, or a test failure if the channel closes
/// or stays silent for [`TEST_TIMEOUT`].
pub async fn next_event(rx: &mut mpsc::Receiver<ReactorEvent>) -> ReactorEvent {
    with_timeout(rx.recv())
        .await
        .expect("reactor event channel closed")
}
