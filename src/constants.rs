//! Crate-wide constants
//!
//! Version, queue defaults and channel handle naming.

// =============================================================================
// Version
// =============================================================================

/// Version string exposed to scripts as `Version`
pub const VERSION: &str = "logging 1.0.0";

/// Version number exposed to scripts as `VersionNum` (major * 10000 + minor * 100 + patch)
pub const VERSION_NUM: u32 = 10000;

// =============================================================================
// Listener
// =============================================================================

/// Default maximum number of queued log messages
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 1000;

/// Number of messages drained by `Get()` when no count is given
pub const DEFAULT_GET_COUNT: usize = 1;

// =============================================================================
// Channels
// =============================================================================

/// Upper bound on tag list traversal (guards against corrupted host lists)
pub const MAX_TAG_TRAVERSAL: usize = 256;

/// Extra steps allowed past the channel count when walking the host's
/// channel list (guards against cyclic host lists)
pub const CHANNEL_WALK_SLACK: usize = 64;

/// Type name of channel handles, used in their string form
pub const CHANNEL_TYPE_NAME: &str = "logging::channel";

/// Name of the global namespace value the module installs
pub const NAMESPACE: &str = "logging";
