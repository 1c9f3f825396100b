//! In-process logging host
//!
//! Complete `LoggingHost` implementation backed by a dense channel table.
//! Used by pure-Rust embedders and by the test suites.

use super::{Channel, ChannelId, LoggingHost};
use crate::listener::{LogContext, LogListener};
use crate::logging::{ChannelFlags, Color, Severity};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Logging host keeping channels and listeners in memory.
///
/// Channel ids are dense (`0..channel_count()`) in registration order.
#[derive(Default)]
pub struct InMemoryHost {
    channels: RwLock<Vec<Arc<Channel>>>,
    listeners: RwLock<Vec<Arc<dyn LogListener>>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, or return the id of an existing channel with this name.
    ///
    /// Returns `ChannelId::INVALID` once the id space is exhausted.
    pub fn register_channel<I, S>(&self, name: &str, tags: I, severity: Severity, color: Color) -> ChannelId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = {
            let mut channels = self.channels.write();
            if let Some(existing) = channels.iter().find(|c| c.name() == name) {
                return existing.id();
            }

            let id = match id_for_index(channels.len()) {
                Some(id) => id,
                None => {
                    drop(channels);
                    warn!("Channel table full, {} not registered", name);
                    return ChannelId::INVALID;
                }
            };
            let channel = Channel::new(id, name, tags)
                .with_minimum_severity(severity)
                .with_color(color);
            channels.push(Arc::new(channel));
            id
        };
        // Outside the table lock: the event may be forwarded back into `log`
        debug!("Registered logging channel {} ({})", name, id);
        id
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Log `text` on `channel` with the channel's own color.
    ///
    /// Returns false when the channel is unknown or `severity` is below its threshold.
    pub fn log(&self, channel: ChannelId, severity: Severity, text: &str) -> bool {
        let color = match self.channel(channel) {
            Some(c) => c.color(),
            None => return false,
        };
        self.log_with_color(channel, severity, color, text)
    }

    /// Log `text` on `channel` with an explicit color
    pub fn log_with_color(&self, channel: ChannelId, severity: Severity, color: Color, text: &str) -> bool {
        if !self.is_channel_enabled(channel, severity) {
            return false;
        }

        let context = LogContext {
            channel,
            severity,
            color,
            flags: self.channel_flags(channel),
        };
        self.dispatch(&context, text);
        true
    }

    /// Deliver an event to every listener without any channel checks
    pub fn dispatch(&self, context: &LogContext, text: &str) {
        // Snapshot so listeners run without the registration lock held
        let listeners: Vec<Arc<dyn LogListener>> = self.listeners.read().clone();
        for listener in &listeners {
            listener.on_log_event(context, text);
        }
    }

    fn for_each_channel(&self, mut f: impl FnMut(&Channel)) {
        for channel in self.channels.read().iter() {
            f(channel);
        }
    }
}

/// Id for the channel stored at `index`, `None` past `i32::MAX`
fn id_for_index(index: usize) -> Option<ChannelId> {
    i32::try_from(index).ok().map(ChannelId::new)
}

impl LoggingHost for InMemoryHost {
    fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    fn first_channel_id(&self) -> ChannelId {
        if self.channels.read().is_empty() {
            ChannelId::INVALID
        } else {
            ChannelId::new(0)
        }
    }

    fn next_channel_id(&self, id: ChannelId) -> ChannelId {
        match id.index() {
            Some(index) if index + 1 < self.channel_count() => ChannelId::new(id.raw() + 1),
            _ => ChannelId::INVALID,
        }
    }

    fn channel(&self, id: ChannelId) -> Option<Arc<Channel>> {
        let index = id.index()?;
        self.channels.read().get(index).cloned()
    }

    fn find_channel(&self, name: &str) -> ChannelId {
        self.channels
            .read()
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.id())
            .unwrap_or(ChannelId::INVALID)
    }

    fn is_channel_enabled(&self, id: ChannelId, severity: Severity) -> bool {
        self.channel(id)
            .map(|c| c.is_enabled(severity))
            .unwrap_or(false)
    }

    fn set_channel_min_severity(&self, id: ChannelId, severity: Severity) {
        if let Some(channel) = self.channel(id) {
            channel.store_minimum_severity(severity);
        }
    }

    fn set_channel_min_severity_by_name(&self, name: &str, severity: Severity) {
        self.for_each_channel(|c| {
            if c.name() == name {
                c.store_minimum_severity(severity);
            }
        });
    }

    fn set_channel_min_severity_by_tag(&self, tag: &str, severity: Severity) {
        self.for_each_channel(|c| {
            if c.has_tag(tag) {
                c.store_minimum_severity(severity);
            }
        });
    }

    fn set_global_min_severity(&self, severity: Severity) {
        self.for_each_channel(|c| c.store_minimum_severity(severity));
    }

    fn channel_flags(&self, id: ChannelId) -> ChannelFlags {
        self.channel(id)
            .map(|c| c.flags())
            .unwrap_or(ChannelFlags::NONE)
    }

    fn set_channel_flags(&self, id: ChannelId, flags: ChannelFlags) {
        if let Some(channel) = self.channel(id) {
            channel.store_flags(flags);
        }
    }

    fn register_listener(&self, listener: Arc<dyn LogListener>) {
        self.listeners.write().push(listener);
    }

    fn unregister_listener(&self, listener: &Arc<dyn LogListener>) {
        self.listeners
            .write()
            .retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
    }
}
