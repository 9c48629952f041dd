//! cli::logging
//!
//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise the configured filter is used. Logs
//! go to stderr so they never mix with rendered responses.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// A second call leaves the first subscriber in place.
pub fn init(fallback: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_level(true)
        .try_init();

    if let Err(e) = result {
        eprintln!("log system initialization failed: {e}");
    }
}
