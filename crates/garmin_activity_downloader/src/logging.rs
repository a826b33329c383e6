//! Tracing subscriber setup for the `gad` binary.

use tracing_subscriber::EnvFilter;

/// Filter used when the configured directive cannot be parsed.
pub const FALLBACK_FILTER: &str = "info";

/// Build the filter for `log_env`, falling back to [`FALLBACK_FILTER`].
pub fn env_filter(log_env: &str) -> EnvFilter {
    EnvFilter::try_new(log_env).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
}

/// Install a compact stderr subscriber. Stdout is left to prompts and output.
pub fn init(log_env: &str) {
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter(log_env))
        .init();
}
