//! Structured logging setup.
//!
//! Ambient plumbing only: the selector never logs through a global, since
//! its output is diagnostic, not part of the returned data. Diagnostics go
//! through `tracing`'s ambient subscriber, installed once by
//! [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Install a `tracing-subscriber` `fmt` layer driven by `RUST_LOG` (default
/// `info`). Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
