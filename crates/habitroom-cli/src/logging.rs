//! Logging setup using tracing.
//!
//! Logs go to stderr so stdout stays clean for JSON output. The level comes
//! from `HABITROOM_LOG`, then the config file's `log.filter`.
//!
//! ```bash
//! HABITROOM_LOG=debug habitroom-cli run
//! ```

use tracing_subscriber::EnvFilter;

const FALLBACK_FILTER: &str = "habitroom=info";

pub fn init(config_filter: &str) {
    let filter = EnvFilter::try_from_env("HABITROOM_LOG")
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
