//! Shared setup for the integration tests

use tracing_subscriber::EnvFilter;

/// Route library logs to the test harness. `RUST_LOG` picks the level;
/// later calls in the same binary are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
