pub mod builders;
pub mod fake_source;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// Logs are captured per test and only shown for failing tests (unless run
/// with `-- --nocapture`). Enable levels with e.g. `RUST_LOG=calcdag=debug`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    with_timeout_of(Duration::from_secs(5), f).await
}

/// Run a future with an explicit timeout.
pub async fn with_timeout_of<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(limit, f)
        .await
        .unwrap_or_else(|_| panic!("Test timed out after {limit:?}"))
}
