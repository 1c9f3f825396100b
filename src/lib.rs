//! Host Log Bridge - engine logging channels exposed to a scripting layer
//!
//! Captures every message the host's logging system dispatches into a
//! bounded in-memory queue, and exposes the host's channel registry
//! (enumeration, lookup, severity thresholds, color, flags) as script
//! values.
//!
//! Usage:
//!   let module = host_log_bridge::load(host, Some(Path::new("logging.toml")));
//!   let batch = module.call("GetAll", &[])?;

pub mod config;
pub mod constants;
pub mod error;
pub mod host;
pub mod listener;
pub mod logging;
pub mod registry;
pub mod script;

pub use config::Config;
pub use error::{BridgeError, Result};
pub use host::{Channel, ChannelId, InMemoryHost, LoggingHost};
pub use listener::{LogContext, LogListener, QueueListener};
pub use logging::{ChannelFlags, Color, LogMessage, Severity};
pub use registry::{ChannelHandle, ChannelRegistry};
pub use script::{LoggingModule, ScriptValue};

use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Load config, start internal tracing and open the module against `host`.
///
/// A config file that cannot be used is reported with `warn!` once tracing
/// is running, and the defaults are used instead.
pub fn load(host: Arc<dyn LoggingHost>, config_path: Option<&Path>) -> LoggingModule {
    let (config, fallback) = match config_path.map(config::load_from) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (Config::default(), Some(e)),
        None => (Config::default(), None),
    };

    match &config.diagnostics.filter {
        Some(filter) => logging::init_tracing_with_filter(filter),
        None => logging::init_tracing(config.diagnostics.verbose),
    }

    if let Some(e) = fallback {
        warn!("{}, using defaults", e);
    }

    LoggingModule::open(host, &config)
}
