//! Logging value types and internal diagnostics
//!
//! - `Severity`, `ChannelFlags`, `Color` - attributes shared by channels and messages
//! - `LogMessage` - a captured log line
//! - `init_tracing` - the crate's own tracing output

pub mod entry;
pub mod severity;

pub use entry::LogMessage;
pub use severity::{ChannelFlags, Color, Severity};

use std::sync::atomic::{AtomicBool, Ordering};

static TRACING_STARTED: AtomicBool = AtomicBool::new(false);

/// Initialize internal tracing for bridge debug output
///
/// Call once when the host loads the module. Repeated calls are ignored.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    init_tracing_with_filter(level);
}

/// Initialize internal tracing with an explicit `EnvFilter` directive
pub fn init_tracing_with_filter(directives: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(directives))
        .try_init();
    TRACING_STARTED.store(true, Ordering::Release);
}

/// True once `init_tracing` or `init_tracing_with_filter` has run
pub fn tracing_started() -> bool {
    TRACING_STARTED.load(Ordering::Acquire)
}
