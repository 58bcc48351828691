//! Diagnostic logging setup for the vtwo binaries.
//!
//! Logs go to stderr so they never interleave with a streamed answer on
//! stdout. The filter is read from `VTWO_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "VTWO_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

/// Install the global `tracing` subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
