//! Script-facing values and argument marshaling
//!
//! `ScriptValue` is the shape the embedding layer converts to and from its
//! own objects: scalars, sequences, string-keyed maps and channel handles.

use crate::error::{BridgeError, Result};
use crate::logging::{ChannelFlags, Color, LogMessage, Severity};
use crate::registry::{severity_from_raw, ChannelHandle};
use std::collections::BTreeMap;

/// Value exchanged with the scripting layer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScriptValue {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    /// 1-based array table on the script side
    Sequence(Vec<ScriptValue>),
    /// String-keyed table
    Map(BTreeMap<String, ScriptValue>),
    Channel(ChannelHandle),
}

impl ScriptValue {
    /// Script-side type name, used in argument errors
    pub fn type_name(&self) -> &'static str {
        match self {
            ScriptValue::Nil => "nil",
            ScriptValue::Bool(_) => "boolean",
            ScriptValue::Number(_) => "number",
            ScriptValue::String(_) => "string",
            ScriptValue::Sequence(_) | ScriptValue::Map(_) => "table",
            ScriptValue::Channel(_) => crate::constants::CHANNEL_TYPE_NAME,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, ScriptValue::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScriptValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScriptValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<&ChannelHandle> {
        match self {
            ScriptValue::Channel(c) => Some(c),
            _ => None,
        }
    }

    /// Field of a map value
    pub fn get(&self, key: &str) -> Option<&ScriptValue> {
        match self {
            ScriptValue::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// JSON form; channel handles become their string form
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            ScriptValue::Nil => Value::Null,
            ScriptValue::Bool(b) => Value::Bool(*b),
            ScriptValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ScriptValue::String(s) => Value::String(s.clone()),
            ScriptValue::Sequence(items) => {
                Value::Array(items.iter().map(ScriptValue::to_json).collect())
            }
            ScriptValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ScriptValue::Channel(handle) => Value::String(handle.to_string()),
        }
    }
}

impl From<bool> for ScriptValue {
    fn from(value: bool) -> Self {
        ScriptValue::Bool(value)
    }
}

impl From<f64> for ScriptValue {
    fn from(value: f64) -> Self {
        ScriptValue::Number(value)
    }
}

impl From<u32> for ScriptValue {
    fn from(value: u32) -> Self {
        ScriptValue::Number(f64::from(value))
    }
}

impl From<usize> for ScriptValue {
    fn from(value: usize) -> Self {
        ScriptValue::Number(value as f64)
    }
}

impl From<&str> for ScriptValue {
    fn from(value: &str) -> Self {
        ScriptValue::String(value.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(value: String) -> Self {
        ScriptValue::String(value)
    }
}

impl From<Severity> for ScriptValue {
    fn from(value: Severity) -> Self {
        ScriptValue::Number(f64::from(value.as_u8()))
    }
}

impl From<ChannelFlags> for ScriptValue {
    fn from(value: ChannelFlags) -> Self {
        ScriptValue::from(value.bits())
    }
}

impl From<Color> for ScriptValue {
    fn from(color: Color) -> Self {
        let mut map = BTreeMap::new();
        map.insert("r".to_string(), ScriptValue::from(u32::from(color.r)));
        map.insert("g".to_string(), ScriptValue::from(u32::from(color.g)));
        map.insert("b".to_string(), ScriptValue::from(u32::from(color.b)));
        map.insert("a".to_string(), ScriptValue::from(u32::from(color.a)));
        ScriptValue::Map(map)
    }
}

impl From<ChannelHandle> for ScriptValue {
    fn from(handle: ChannelHandle) -> Self {
        ScriptValue::Channel(handle)
    }
}

impl From<Option<ChannelHandle>> for ScriptValue {
    fn from(handle: Option<ChannelHandle>) -> Self {
        handle.map(ScriptValue::Channel).unwrap_or_default()
    }
}

impl From<&LogMessage> for ScriptValue {
    fn from(message: &LogMessage) -> Self {
        let mut map = BTreeMap::new();
        map.insert("Timestamp".to_string(), ScriptValue::Number(message.timestamp));
        map.insert("Severity".to_string(), ScriptValue::from(message.severity));
        map.insert(
            "ChannelID".to_string(),
            ScriptValue::Number(f64::from(message.channel.raw())),
        );
        map.insert("Color".to_string(), ScriptValue::from(message.color));
        map.insert("Flags".to_string(), ScriptValue::from(message.flags));
        map.insert("Message".to_string(), ScriptValue::from(message.text.as_str()));
        ScriptValue::Map(map)
    }
}

// =============================================================================
// Argument marshaling
// =============================================================================

/// Argument at 0-based `index`; missing arguments read as nil
pub fn arg(args: &[ScriptValue], index: usize) -> &ScriptValue {
    static NIL: ScriptValue = ScriptValue::Nil;
    args.get(index).unwrap_or(&NIL)
}

/// Number argument, without range checks
pub fn number_arg(args: &[ScriptValue], index: usize) -> Result<f64> {
    let value = arg(args, index);
    value.as_number().ok_or(BridgeError::BadArgument {
        index: index + 1,
        expected: "number",
        found: value.type_name(),
    })
}

/// Number argument within `min..=max`, fraction truncated
pub fn bounded_number_arg(
    args: &[ScriptValue],
    index: usize,
    what: &'static str,
    min: f64,
    max: f64,
) -> Result<f64> {
    let number = number_arg(args, index)?;
    check_bounds(number, what, min, max)
}

fn check_bounds(number: f64, what: &'static str, min: f64, max: f64) -> Result<f64> {
    // NaN fails both comparisons, reject it explicitly
    if number.is_nan() || number < min || number > max {
        return Err(BridgeError::NumberOutOfBounds {
            what,
            value: number,
            min,
            max,
        });
    }
    Ok(number.trunc())
}

/// Non-negative count argument
pub fn count_arg(args: &[ScriptValue], index: usize) -> Result<usize> {
    let count = bounded_number_arg(args, index, "count", 0.0, usize::MAX as f64)?;
    Ok(count as usize)
}

/// Severity argument, rejected unless it is one of the four levels
pub fn severity_arg(args: &[ScriptValue], index: usize) -> Result<Severity> {
    let number = number_arg(args, index)?;
    let lowest = f64::from(Severity::LOWEST.as_u8());
    let highest = f64::from(Severity::HIGHEST.as_u8());
    if number.is_nan() || number < lowest || number > highest {
        return Err(BridgeError::InvalidSeverity { value: number });
    }
    severity_from_raw(number.trunc() as i64)
}

/// Flags argument (any 32-bit pattern)
pub fn flags_arg(args: &[ScriptValue], index: usize) -> Result<ChannelFlags> {
    let bits = bounded_number_arg(args, index, "flags", 0.0, f64::from(u32::MAX))?;
    Ok(ChannelFlags::from_bits(bits as u32))
}

/// String argument
pub fn string_arg(args: &[ScriptValue], index: usize) -> Result<&str> {
    let value = arg(args, index);
    value.as_str().ok_or(BridgeError::BadArgument {
        index: index + 1,
        expected: "string",
        found: value.type_name(),
    })
}

/// Color argument: a map with `r`, `g`, `b`, `a` numbers in `0..=255`
pub fn color_arg(args: &[ScriptValue], index: usize) -> Result<Color> {
    to_color(arg(args, index))
}

/// Convert a `{r, g, b, a}` map into a color
pub fn to_color(value: &ScriptValue) -> Result<Color> {
    if !matches!(value, ScriptValue::Map(_)) {
        return Err(BridgeError::InvalidColor {
            reason: "color needs to be a table".to_string(),
        });
    }

    let component = |key: &str, name: &str| -> Result<u8> {
        let number = value
            .get(key)
            .and_then(ScriptValue::as_number)
            .ok_or_else(|| BridgeError::InvalidColor {
                reason: format!("amount of {} is missing", name),
            })?;
        if number.is_nan() || !(0.0..=255.0).contains(&number) {
            return Err(BridgeError::InvalidColor {
                reason: format!("amount of {} is out of bounds", name),
            });
        }
        Ok(number as u8)
    };

    Ok(Color::new(
        component("r", "red")?,
        component("g", "green")?,
        component("b", "blue")?,
        component("a", "alpha")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ChannelId;

    fn color_map(r: f64, g: f64, b: f64, a: f64) -> ScriptValue {
        let mut map = BTreeMap::new();
        map.insert("r".to_string(), ScriptValue::Number(r));
        map.insert("g".to_string(), ScriptValue::Number(g));
        map.insert("b".to_string(), ScriptValue::Number(b));
        map.insert("a".to_string(), ScriptValue::Number(a));
        ScriptValue::Map(map)
    }

    // === Numbers ===

    #[test]
    fn test_number_arg_type_error() {
        let args = [ScriptValue::from("ten")];
        match number_arg(&args, 0) {
            Err(BridgeError::BadArgument {
                index, found, ..
            }) => {
                assert_eq!(index, 1);
                assert_eq!(found, "string");
            }
            other => panic!("Expected BadArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_argument_reads_as_nil() {
        let err = number_arg(&[], 0).unwrap_err();
        assert!(err.to_string().contains("got nil"));
    }

    #[test]
    fn test_count_arg_truncates_and_rejects_negative() {
        assert_eq!(count_arg(&[ScriptValue::Number(2.9)], 0).unwrap(), 2);
        assert!(matches!(
            count_arg(&[ScriptValue::Number(-1.0)], 0),
            Err(BridgeError::NumberOutOfBounds { .. })
        ));
        assert!(count_arg(&[ScriptValue::Number(f64::NAN)], 0).is_err());
    }

    #[test]
    fn test_severity_arg_range() {
        assert_eq!(severity_arg(&[ScriptValue::Number(1.0)], 0).unwrap(), Severity::Warning);
        assert!(matches!(
            severity_arg(&[ScriptValue::Number(99.0)], 0),
            Err(BridgeError::InvalidSeverity { .. })
        ));
        assert!(matches!(
            severity_arg(&[ScriptValue::Number(-0.5)], 0),
            Err(BridgeError::InvalidSeverity { .. })
        ));
    }

    #[test]
    fn test_flags_arg() {
        assert_eq!(flags_arg(&[ScriptValue::Number(3.0)], 0).unwrap().bits(), 3);
        assert!(flags_arg(&[ScriptValue::Number(-1.0)], 0).is_err());
        assert!(flags_arg(&[ScriptValue::Number(4_294_967_296.0)], 0).is_err());
    }

    // === Colors ===

    #[test]
    fn test_color_roundtrip_through_map() {
        let color = Color::new(10, 20, 30, 40);
        assert_eq!(to_color(&ScriptValue::from(color)).unwrap(), color);
    }

    #[test]
    fn test_color_requires_table() {
        let err = to_color(&ScriptValue::Number(1.0)).unwrap_err();
        assert_eq!(err.to_string(), "invalid color: color needs to be a table");
    }

    #[test]
    fn test_color_component_out_of_bounds() {
        let err = to_color(&color_map(0.0, 256.0, 0.0, 0.0)).unwrap_err();
        assert!(err.to_string().contains("amount of green is out of bounds"));
    }

    #[test]
    fn test_color_component_missing() {
        let mut value = color_map(1.0, 2.0, 3.0, 4.0);
        if let ScriptValue::Map(map) = &mut value {
            map.remove("a");
        }
        let err = to_color(&value).unwrap_err();
        assert!(err.to_string().contains("amount of alpha is missing"));
    }

    // === Messages ===

    #[test]
    fn test_message_projection_fields() {
        let message = LogMessage::with_timestamp(
            5.25,
            Severity::Assert,
            ChannelId::new(4),
            Color::new(1, 2, 3, 4),
            ChannelFlags::CONSOLE_ONLY,
            "hello",
        );
        let value = ScriptValue::from(&message);

        assert_eq!(value.get("Timestamp"), Some(&ScriptValue::Number(5.25)));
        assert_eq!(value.get("Severity"), Some(&ScriptValue::Number(2.0)));
        assert_eq!(value.get("ChannelID"), Some(&ScriptValue::Number(4.0)));
        assert_eq!(value.get("Flags"), Some(&ScriptValue::Number(1.0)));
        assert_eq!(value.get("Message"), Some(&ScriptValue::from("hello")));
        assert_eq!(
            value.get("Color").and_then(|c| c.get("b")),
            Some(&ScriptValue::Number(3.0))
        );
    }

    #[test]
    fn test_to_json() {
        let value = ScriptValue::Sequence(vec![
            ScriptValue::Nil,
            ScriptValue::Bool(true),
            ScriptValue::Number(1.5),
            ScriptValue::from("x"),
        ]);
        assert_eq!(value.to_json().to_string(), r#"[null,true,1.5,"x"]"#);
    }
}
