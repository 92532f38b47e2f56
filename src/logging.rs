//! Process-wide structured logging.
//!
//! Diagnostics go to stderr so `imgrelay invoke` can print the response JSON
//! on stdout untouched. The level comes from `RUST_LOG` (default `info`).
//! Every execution trace entry is mirrored at `debug` under the
//! `imgrelay::trace` target, so `RUST_LOG=imgrelay::trace=debug` shows the
//! client-facing log as it is written.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
