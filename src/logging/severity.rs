//! Severity, flag and color types shared by channels and captured messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Ordered importance of a log line (`Message < Warning < Assert < Error`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Severity {
    Message = 0,
    Warning = 1,
    Assert = 2,
    Error = 3,
}

impl Severity {
    /// All levels, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Message,
        Severity::Warning,
        Severity::Assert,
        Severity::Error,
    ];

    pub const LOWEST: Severity = Severity::Message;
    pub const HIGHEST: Severity = Severity::Error;

    /// Numeric value as seen by scripts
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Constant name used in the scripting namespace
    pub fn constant_name(self) -> &'static str {
        match self {
            Severity::Message => "SEVERITY_MESSAGE",
            Severity::Warning => "SEVERITY_WARNING",
            Severity::Assert => "SEVERITY_ASSERT",
            Severity::Error => "SEVERITY_ERROR",
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> u8 {
        severity.as_u8()
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(Severity::Message),
            1 => Ok(Severity::Warning),
            2 => Ok(Severity::Assert),
            3 => Ok(Severity::Error),
            other => Err(format!("invalid logging severity: {}", other)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Message => "message",
            Severity::Warning => "warning",
            Severity::Assert => "assert",
            Severity::Error => "error",
        };
        f.write_str(name)
    }
}

/// Routing bits attached to channels and messages.
///
/// Unknown bits are preserved so hosts can extend the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelFlags(u32);

impl ChannelFlags {
    pub const NONE: ChannelFlags = ChannelFlags(0);
    /// Only write to the console, never to other log sinks
    pub const CONSOLE_ONLY: ChannelFlags = ChannelFlags(0x0000_0001);
    /// Do not echo to the remote/debug output
    pub const DO_NOT_ECHO: ChannelFlags = ChannelFlags(0x0000_0002);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: ChannelFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ChannelFlags {
    type Output = ChannelFlags;

    fn bitor(self, rhs: ChannelFlags) -> ChannelFlags {
        ChannelFlags(self.0 | rhs.0)
    }
}

impl BitAnd for ChannelFlags {
    type Output = ChannelFlags;

    fn bitand(self, rhs: ChannelFlags) -> ChannelFlags {
        ChannelFlags(self.0 & rhs.0)
    }
}

/// 8-bit RGBA display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Message < Severity::Warning);
        assert!(Severity::Warning < Severity::Assert);
        assert!(Severity::Assert < Severity::Error);
        assert_eq!(Severity::ALL.first(), Some(&Severity::LOWEST));
        assert_eq!(Severity::ALL.last(), Some(&Severity::HIGHEST));
    }

    #[test]
    fn test_severity_try_from_rejects_out_of_range() {
        assert_eq!(Severity::try_from(2), Ok(Severity::Assert));
        assert!(Severity::try_from(4).is_err());
        assert!(Severity::try_from(99).is_err());
    }

    #[test]
    fn test_severity_serializes_as_number() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<Severity>("7").is_err());
    }

    #[test]
    fn test_flags_contains() {
        let flags = ChannelFlags::CONSOLE_ONLY | ChannelFlags::DO_NOT_ECHO;
        assert!(flags.contains(ChannelFlags::CONSOLE_ONLY));
        assert!(flags.contains(ChannelFlags::DO_NOT_ECHO));
        assert!(!ChannelFlags::CONSOLE_ONLY.contains(ChannelFlags::DO_NOT_ECHO));
        assert_eq!(flags.bits(), 3);
    }

    #[test]
    fn test_flags_keep_unknown_bits() {
        let flags = ChannelFlags::from_bits(0x80);
        assert_eq!(flags.bits(), 0x80);
        assert!(!flags.is_empty());
        assert_eq!((flags & ChannelFlags::CONSOLE_ONLY), ChannelFlags::NONE);
    }
}
