pub mod builders;
pub mod fakes;

use std::sync::{Arc, Mutex, Once};

use chrono::{DateTime, Utc};
use repolaunch::wait::ProgressSink;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Progress sink that keeps every observation for later assertions.
#[derive(Clone, Default)]
pub struct RecordingProgress {
    seen: Arc<Mutex<Vec<(DateTime<Utc>, usize)>>>,
}

impl RecordingProgress {
    pub fn remaining_counts(&self) -> Vec<usize> {
        self.seen.lock().unwrap().iter().map(|(_, n)| *n).collect()
    }

    pub fn observations(&self) -> Vec<(DateTime<Utc>, usize)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn observe(&self, at: DateTime<Utc>, remaining: usize) {
        self.seen.lock().unwrap().push((at, remaining));
    }
}
