//! Channel handle methods and per-channel user tables
//!
//! Field lookups on a handle resolve methods first, then the channel's
//! user table. Field writes always land in the user table.

use super::value::{color_arg, flags_arg, severity_arg, ScriptValue};
use crate::error::{BridgeError, Result};
use crate::host::ChannelId;
use crate::registry::{ChannelHandle, ChannelRegistry};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

/// Methods available on every channel handle
pub const CHANNEL_METHODS: &[&str] = &[
    "GetTable",
    "GetChannelID",
    "GetName",
    "GetTags",
    "IsSeverityEnabled",
    "GetMinimumSeverity",
    "SetMinimumSeverity",
    "GetColor",
    "SetColor",
    "GetFlags",
    "SetFlags",
];

/// Result of reading a field on a channel handle
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Name of a built-in method; call it with `call_method`
    Method(&'static str),
    /// Value stored in the user table (nil when unset)
    Value(ScriptValue),
}

/// User tables attached to channel handles, keyed by channel id
#[derive(Default)]
pub struct UserTables {
    tables: Mutex<HashMap<ChannelId, BTreeMap<String, ScriptValue>>>,
}

impl UserTables {
    pub fn get(&self, channel: &ChannelHandle, key: &str) -> ScriptValue {
        self.tables
            .lock()
            .get(&channel.id())
            .and_then(|table| table.get(key).cloned())
            .unwrap_or_default()
    }

    /// Store `value` under `key`; nil removes the entry
    pub fn set(&self, channel: &ChannelHandle, key: &str, value: ScriptValue) {
        let mut tables = self.tables.lock();
        if value.is_nil() {
            if let Some(table) = tables.get_mut(&channel.id()) {
                table.remove(key);
            }
            return;
        }
        tables
            .entry(channel.id())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Whole user table as a map value
    pub fn table(&self, channel: &ChannelHandle) -> ScriptValue {
        let table = self
            .tables
            .lock()
            .get(&channel.id())
            .cloned()
            .unwrap_or_default();
        ScriptValue::Map(table)
    }

    pub fn clear(&self) {
        self.tables.lock().clear();
    }
}

/// Resolve `key` on a handle: methods shadow user fields
pub fn get_field(tables: &UserTables, channel: &ChannelHandle, key: &str) -> Field {
    match CHANNEL_METHODS.iter().find(|m| **m == key) {
        Some(method) => Field::Method(*method),
        None => Field::Value(tables.get(channel, key)),
    }
}

/// Handle equality as seen by scripts: false unless both are channels
pub fn channels_equal(left: &ScriptValue, right: &ScriptValue) -> bool {
    match (left.as_channel(), right.as_channel()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}

/// Invoke a channel method; `args` excludes the handle itself
pub fn call_method(
    registry: &ChannelRegistry,
    tables: &UserTables,
    channel: &ChannelHandle,
    method: &str,
    args: &[ScriptValue],
) -> Result<ScriptValue> {
    let value = match method {
        "GetTable" => tables.table(channel),
        "GetChannelID" => ScriptValue::Number(f64::from(channel.id().raw())),
        "GetName" => ScriptValue::from(channel.name()),
        "GetTags" => ScriptValue::Sequence(
            channel.tags().into_iter().map(ScriptValue::from).collect(),
        ),
        "IsSeverityEnabled" => {
            let severity = severity_arg(args, 0)?;
            ScriptValue::Bool(registry.is_severity_enabled(channel, severity))
        }
        "GetMinimumSeverity" => ScriptValue::from(registry.minimum_severity(channel)),
        "SetMinimumSeverity" => {
            let severity = severity_arg(args, 0)?;
            registry.set_minimum_severity(channel, severity);
            ScriptValue::Nil
        }
        "GetColor" => ScriptValue::from(registry.color(channel)),
        "SetColor" => {
            let color = color_arg(args, 0)?;
            registry.set_color(channel, color);
            ScriptValue::Nil
        }
        "GetFlags" => ScriptValue::from(registry.flags(channel)),
        "SetFlags" => {
            let flags = flags_arg(args, 0)?;
            registry.set_flags(channel, flags);
            ScriptValue::Nil
        }
        other => {
            return Err(BridgeError::UnknownFunction {
                name: other.to_string(),
            })
        }
    };
    Ok(value)
}
