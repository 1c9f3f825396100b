//! Captured log message
//!
//! Snapshot of one line the host logged, owned by value.

use super::{ChannelFlags, Color, Severity};
use crate::host::ChannelId;
use serde::{Deserialize, Serialize};

/// Log line captured from the host (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Seconds since the Unix epoch at capture time
    pub timestamp: f64,
    pub severity: Severity,
    /// Originating channel; may no longer be enumerable
    pub channel: ChannelId,
    pub color: Color,
    pub flags: ChannelFlags,
    pub text: String,
}

impl LogMessage {
    /// Seconds since the Unix epoch, microsecond resolution
    #[inline]
    fn now() -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }

    /// Create a message stamped with the current time
    pub fn new(
        severity: Severity,
        channel: ChannelId,
        color: Color,
        flags: ChannelFlags,
        text: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(Self::now(), severity, channel, color, flags, text)
    }

    /// Create a message with an explicit timestamp
    pub fn with_timestamp(
        timestamp: f64,
        severity: Severity,
        channel: ChannelId,
        color: Color,
        flags: ChannelFlags,
        text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            severity,
            channel,
            color,
            flags,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_captures_current_time() {
        let before = chrono::Utc::now().timestamp() as f64;
        let message = LogMessage::new(
            Severity::Warning,
            ChannelId::new(3),
            Color::new(255, 0, 0, 255),
            ChannelFlags::NONE,
            "disk almost full",
        );
        let after = chrono::Utc::now().timestamp() as f64 + 1.0;

        assert!(message.timestamp >= before && message.timestamp <= after);
        assert_eq!(message.severity, Severity::Warning);
        assert_eq!(message.channel, ChannelId::new(3));
        assert_eq!(message.text, "disk almost full");
    }

    #[test]
    fn test_message_serialization() {
        let message = LogMessage::with_timestamp(
            12.5,
            Severity::Error,
            ChannelId::new(1),
            Color::new(1, 2, 3, 4),
            ChannelFlags::DO_NOT_ECHO,
            "boom",
        );
        let json = serde_json::to_string(&message).unwrap();

        assert!(json.contains("\"timestamp\":12.5"));
        assert!(json.contains("\"severity\":3"));
        assert!(json.contains("\"channel\":1"));
        assert!(json.contains("\"flags\":2"));
        assert!(json.contains("boom"));
    }
}
