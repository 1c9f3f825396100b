//! Host logging system interface
//!
//! The host application owns the logging channels and emits log events.
//! This module describes what the bridge needs from it:
//! - `ChannelId` - host-assigned channel identifier with an invalid sentinel
//! - `Channel` - the host-owned channel record (shared, interior-mutable)
//! - `LoggingHost` - accessors and mutators the host provides
//!
//! `InMemoryHost` is a complete in-process implementation.

pub mod memory;

pub use memory::InMemoryHost;

use crate::constants::MAX_TAG_TRAVERSAL;
use crate::listener::LogListener;
use crate::logging::{ChannelFlags, Color, Severity};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

// =============================================================================
// Channel ID
// =============================================================================

/// Host-assigned channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(i32);

impl ChannelId {
    /// "No channel" sentinel
    pub const INVALID: ChannelId = ChannelId(-1);

    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 >= 0
    }

    /// Index into a dense channel table, `None` for the sentinel
    #[inline]
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Channel record
// =============================================================================

/// One entry of a channel's tag list (host-owned linked structure)
#[derive(Debug)]
pub struct ChannelTag {
    name: String,
    next: Option<Box<ChannelTag>>,
}

impl ChannelTag {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn next(&self) -> Option<&ChannelTag> {
        self.next.as_deref()
    }
}

/// Host-owned logging channel record.
///
/// Identity (id, name, tags) is fixed at registration. Severity threshold,
/// color and flags are interior-mutable so the host and the bridge can
/// update them through a shared `Arc<Channel>`.
#[derive(Debug)]
pub struct Channel {
    id: ChannelId,
    name: String,
    first_tag: Option<Box<ChannelTag>>,
    minimum_severity: AtomicU8,
    flags: AtomicU32,
    color: RwLock<Color>,
}

impl Channel {
    /// Create a channel record; tags keep the given order
    pub fn new<I, S>(id: ChannelId, name: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = tags.into_iter().map(Into::into).collect();
        let first_tag = names
            .into_iter()
            .rev()
            .fold(None, |next, name| Some(Box::new(ChannelTag { name, next })));

        Self {
            id,
            name: name.into(),
            first_tag,
            minimum_severity: AtomicU8::new(Severity::LOWEST.as_u8()),
            flags: AtomicU32::new(0),
            color: RwLock::new(Color::default()),
        }
    }

    pub fn with_minimum_severity(self, severity: Severity) -> Self {
        self.store_minimum_severity(severity);
        self
    }

    pub fn with_color(self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    pub fn with_flags(self, flags: ChannelFlags) -> Self {
        self.store_flags(flags);
        self
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Head of the tag list
    pub fn first_tag(&self) -> Option<&ChannelTag> {
        self.first_tag.as_deref()
    }

    /// Tag names in list order, at most `MAX_TAG_TRAVERSAL` of them
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        std::iter::successors(self.first_tag(), |tag| tag.next())
            .take(MAX_TAG_TRAVERSAL)
            .map(ChannelTag::name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|t| t == tag)
    }

    pub fn minimum_severity(&self) -> Severity {
        Severity::try_from(self.minimum_severity.load(Ordering::Acquire))
            .unwrap_or(Severity::LOWEST)
    }

    /// Raw threshold write, for host implementations
    pub fn store_minimum_severity(&self, severity: Severity) {
        self.minimum_severity
            .store(severity.as_u8(), Ordering::Release);
    }

    /// True iff `severity` passes this channel's threshold
    #[inline]
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= self.minimum_severity()
    }

    pub fn flags(&self) -> ChannelFlags {
        ChannelFlags::from_bits(self.flags.load(Ordering::Acquire))
    }

    /// Raw flags write, for host implementations
    pub fn store_flags(&self, flags: ChannelFlags) {
        self.flags.store(flags.bits(), Ordering::Release);
    }

    pub fn color(&self) -> Color {
        *self.color.read()
    }

    /// Color is written directly on the record
    pub fn set_color(&self, color: Color) {
        *self.color.write() = color;
    }
}

// =============================================================================
// Host interface
// =============================================================================

/// Accessors the host logging system provides.
///
/// Mirrors the host's flat logging API: channel ids are walked with
/// `first_channel_id`/`next_channel_id` until `ChannelId::INVALID`.
/// Thread safety of channel mutation is the host's responsibility.
pub trait LoggingHost: Send + Sync {
    /// Number of registered channels
    fn channel_count(&self) -> usize;

    /// First channel id, or `ChannelId::INVALID` if there are none
    fn first_channel_id(&self) -> ChannelId;

    /// Channel following `id`, or `ChannelId::INVALID` at the end
    fn next_channel_id(&self, id: ChannelId) -> ChannelId;

    /// Live channel record
    fn channel(&self, id: ChannelId) -> Option<Arc<Channel>>;

    /// Exact name lookup, `ChannelId::INVALID` if absent
    fn find_channel(&self, name: &str) -> ChannelId;

    /// Host enable policy for `severity` on channel `id`
    fn is_channel_enabled(&self, id: ChannelId, severity: Severity) -> bool;

    fn set_channel_min_severity(&self, id: ChannelId, severity: Severity);

    fn set_channel_min_severity_by_name(&self, name: &str, severity: Severity);

    fn set_channel_min_severity_by_tag(&self, tag: &str, severity: Severity);

    fn set_global_min_severity(&self, severity: Severity);

    fn channel_flags(&self, id: ChannelId) -> ChannelFlags;

    fn set_channel_flags(&self, id: ChannelId, flags: ChannelFlags);

    /// Subscribe `listener` to every log event
    fn register_listener(&self, listener: Arc<dyn LogListener>);

    /// Remove a listener previously registered (matched by identity)
    fn unregister_listener(&self, listener: &Arc<dyn LogListener>);
}
