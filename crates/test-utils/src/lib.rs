pub mod builders;
pub mod gate;
pub mod recorder;

use std::sync::Once;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=ticketpool=trace cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .with_thread_names(true)
            .init();
    });
}

/// Run `f` on a helper thread and fail the test if it takes longer than
/// 10 seconds. A hung pool shows up as a test failure instead of a stuck
/// test binary.
pub fn with_timeout<F, T>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("test-timeout".to_string())
        .spawn(move || {
            let _ = tx.send(f());
        })
        .expect("failed to spawn timeout thread");

    rx.recv_timeout(Duration::from_secs(10))
        .expect("Test timed out after 10 seconds")
}
