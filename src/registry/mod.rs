//! Channel registry view
//!
//! Read/write projection over the host's channel table. Nothing here owns
//! channel data: every query and mutation goes through `LoggingHost` or
//! the shared `Channel` record, with no extra locking from this layer.

use crate::constants::{CHANNEL_TYPE_NAME, CHANNEL_WALK_SLACK};
use crate::error::{BridgeError, Result};
use crate::host::{Channel, ChannelId, LoggingHost};
use crate::logging::{ChannelFlags, Color, Severity};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// Validate a raw severity number before it reaches the host
pub fn severity_from_raw(value: i64) -> Result<Severity> {
    u8::try_from(value)
        .ok()
        .and_then(|v| Severity::try_from(v).ok())
        .ok_or(BridgeError::InvalidSeverity {
            value: value as f64,
        })
}

// =============================================================================
// Channel handle
// =============================================================================

/// Handle to a live host channel record.
///
/// Two handles are equal iff they point at the same record.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    channel: Arc<Channel>,
}

impl ChannelHandle {
    pub fn new(channel: Arc<Channel>) -> Self {
        Self { channel }
    }

    pub fn id(&self) -> ChannelId {
        self.channel.id()
    }

    pub fn name(&self) -> &str {
        self.channel.name()
    }

    /// Tag names in host list order
    pub fn tags(&self) -> Vec<String> {
        self.channel.tags().map(String::from).collect()
    }

    pub fn minimum_severity(&self) -> Severity {
        self.channel.minimum_severity()
    }

    pub fn color(&self) -> Color {
        self.channel.color()
    }

    /// Address of the host record, stable for the record's lifetime
    pub fn address(&self) -> usize {
        Arc::as_ptr(&self.channel) as usize
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }
}

impl PartialEq for ChannelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.channel, &other.channel)
    }
}

impl Eq for ChannelHandle {}

impl Hash for ChannelHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:p}", CHANNEL_TYPE_NAME, Arc::as_ptr(&self.channel))
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Query/mutation view over the host's channels
#[derive(Clone)]
pub struct ChannelRegistry {
    host: Arc<dyn LoggingHost>,
}

impl ChannelRegistry {
    pub fn new(host: Arc<dyn LoggingHost>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<dyn LoggingHost> {
        &self.host
    }

    /// Number of channels registered right now
    pub fn count(&self) -> usize {
        self.host.channel_count()
    }

    /// Channel with this id, `None` outside `0..count()`
    pub fn get_by_id(&self, id: i64) -> Option<ChannelHandle> {
        if id < 0 || id >= self.count() as i64 {
            return None;
        }
        let id = ChannelId::new(i32::try_from(id).ok()?);
        self.host.channel(id).map(ChannelHandle::new)
    }

    /// Walk the host's channels from first to the sentinel.
    ///
    /// Stops after `count() + CHANNEL_WALK_SLACK` steps so a cyclic host
    /// list cannot hang the caller.
    pub fn enumerate(&self) -> Vec<ChannelHandle> {
        let count = self.count();
        let host = &self.host;
        std::iter::successors(Some(host.first_channel_id()), |id| {
            Some(host.next_channel_id(*id))
        })
        .take_while(|id| *id != ChannelId::INVALID)
        .take(count.saturating_add(CHANNEL_WALK_SLACK))
        .filter_map(|id| host.channel(id))
        .map(ChannelHandle::new)
        .collect()
    }

    /// Exact-name lookup
    pub fn find_by_name(&self, name: &str) -> Option<ChannelHandle> {
        let id = self.host.find_channel(name);
        if id == ChannelId::INVALID {
            return None;
        }
        self.host.channel(id).map(ChannelHandle::new)
    }

    /// Host enable policy, true iff `severity >= minimum` for plain hosts
    pub fn is_severity_enabled(&self, channel: &ChannelHandle, severity: Severity) -> bool {
        self.host.is_channel_enabled(channel.id(), severity)
    }

    pub fn minimum_severity(&self, channel: &ChannelHandle) -> Severity {
        channel.minimum_severity()
    }

    pub fn set_minimum_severity(&self, channel: &ChannelHandle, severity: Severity) {
        debug!("Channel {} minimum severity -> {}", channel.name(), severity);
        self.host.set_channel_min_severity(channel.id(), severity);
    }

    pub fn color(&self, channel: &ChannelHandle) -> Color {
        channel.color()
    }

    pub fn set_color(&self, channel: &ChannelHandle, color: Color) {
        channel.channel().set_color(color);
    }

    pub fn flags(&self, channel: &ChannelHandle) -> ChannelFlags {
        self.host.channel_flags(channel.id())
    }

    pub fn set_flags(&self, channel: &ChannelHandle, flags: ChannelFlags) {
        self.host.set_channel_flags(channel.id(), flags);
    }

    pub fn set_minimum_severity_by_name(&self, name: &str, severity: Severity) {
        debug!("Channels named {} minimum severity -> {}", name, severity);
        self.host.set_channel_min_severity_by_name(name, severity);
    }

    pub fn set_minimum_severity_by_tag(&self, tag: &str, severity: Severity) {
        debug!("Channels tagged {} minimum severity -> {}", tag, severity);
        self.host.set_channel_min_severity_by_tag(tag, severity);
    }

    pub fn set_global_minimum_severity(&self, severity: Severity) {
        debug!("Global minimum severity -> {}", severity);
        self.host.set_global_min_severity(severity);
    }
}
