// src/util/testing.rs

use std::env;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::bookmark::Bookmark;

/// Environment variables any test may touch; saved and restored by [`EnvGuard`]
const GUARDED_VARS: [&str; 6] = [
    "BOOKMARKS_FILE",
    "BOOKMARKS_FETCH_TIMEOUT",
    "XDG_CONFIG_HOME",
    "HOME",
    "APPDATA",
    "USERPROFILE",
];

#[derive(Debug)]
pub struct TestEnv {
    /// Fixed creation time used by [`bookmark_at`]
    pub epoch: DateTime<Utc>,
}

static TEST_ENV: OnceLock<TestEnv> = OnceLock::new();

/// Initializes the global test environment exactly once and returns it.
pub fn init_test_env() -> &'static TestEnv {
    TEST_ENV.get_or_init(|| {
        setup_test_logging();
        let data = TestEnv {
            // 2021-01-01T00:00:00Z
            epoch: DateTime::from_timestamp(1_609_459_200, 0).unwrap_or_default(),
        };
        info!("Test environment initialized");
        data
    })
}

/// Logging setup only runs once; later calls do nothing if `tracing` is already set.
fn setup_test_logging() {
    debug!("Attempting logger init from testing.rs");
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
        return;
    }

    let noisy_modules = ["reqwest", "hyper", "hyper_util", "lol_html", "mio", "want"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    subscriber.try_init().unwrap_or_else(|e| {
        eprintln!("Error: Failed to set up logging: {}", e);
    });
}

/// A bookmark created at 2021-01-01T00:00:00Z plus `nanos` nanoseconds
pub fn bookmark_at(title: &str, content: &str, nanos: u32) -> Bookmark {
    let created_at = init_test_env().epoch + chrono::Duration::nanoseconds(i64::from(nanos));
    Bookmark::with_created_at(title, content, created_at)
}

/// Restores every guarded environment variable when dropped.
#[derive(Debug, Clone)]
pub struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            saved: GUARDED_VARS
                .iter()
                .map(|&key| (key, env::var(key).ok()))
                .collect(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}
