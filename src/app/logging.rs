//! `tracing` subscriber setup for the CLI and `ccman serve`.

use tracing_subscriber::EnvFilter;

/// Env var holding a full `EnvFilter` directive; falls back to `RUST_LOG`.
pub(crate) const LOG_ENV: &str = "CCMAN_LOG";

/// Directive used when neither `CCMAN_LOG` nor `RUST_LOG` is set.
pub(crate) fn default_directive(verbose: u8, serving: bool) -> &'static str {
    match verbose {
        0 if serving => "ccman=info",
        0 => "ccman=warn",
        1 => "ccman=info",
        _ => "ccman=debug,tower_http=debug",
    }
}

/// Install the global stderr subscriber. Safe to call more than once.
pub(crate) fn init_tracing(verbose: u8, serving: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, serving)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
