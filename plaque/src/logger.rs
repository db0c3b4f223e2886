//! Logging setup
//!
//! The pipeline reports through `tracing`; this installs a subscriber for
//! binaries and tools that drive it. `RUST_LOG` selects the level
//! (default `info`); at debug level span closings are printed too.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Install the global subscriber.
///
/// A host that installed its own subscriber first keeps it, and so does a
/// second call; the refusal is logged at debug level through that
/// subscriber.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let is_debug = env_filter.to_string().contains("debug")
        || std::env::var("RUST_LOG")
            .unwrap_or_default()
            .contains("debug");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        tracing::debug!(error = %e, "global subscriber already set, keeping it");
    }
}
