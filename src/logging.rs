//! Diagnostic logging (stderr)
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` selects debug, else warn.

use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: a second call (tests) is a no-op
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
