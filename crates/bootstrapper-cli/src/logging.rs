//! Structured JSON logging to stdout.

use tracing_subscriber::EnvFilter;

/// Returns the level used when `RUST_LOG` is not set.
const fn default_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}

/// Installs the global subscriber.
///
/// Logs are JSON lines on stdout at `info`, or `debug` with `--debug`.
/// `RUST_LOG` takes precedence when set.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(debug)));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .init();
}
