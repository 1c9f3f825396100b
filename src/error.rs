//! Centralized error types for the bridge
//!
//! All bridge errors are represented by the `BridgeError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, BridgeError>`.
//!
//! Lookup misses (unknown channel id, name or tag) are not errors: they are
//! reported as `None` / `ScriptValue::Nil` by the callers.

use std::fmt;
use std::path::PathBuf;

/// All bridge errors
#[derive(Debug)]
pub enum BridgeError {
    // === Validation ===
    /// Severity value outside `Message..=Error`
    InvalidSeverity { value: f64 },
    /// Numeric argument outside the accepted range
    NumberOutOfBounds {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Argument of the wrong type
    BadArgument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// Color value is not a `{r, g, b, a}` map of 0-255 numbers
    InvalidColor { reason: String },
    /// Value used as a channel handle is not one
    InvalidChannel,

    // === Dispatch ===
    /// No function or method with this name
    UnknownFunction { name: String },
    /// Module was closed; its functions can no longer be called
    ModuleClosed,

    // === Config ===
    /// Config file could not be read
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse { path: PathBuf, reason: String },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSeverity { value } => write!(f, "invalid logging severity: {}", value),
            Self::NumberOutOfBounds {
                what,
                value,
                min,
                max,
            } => write!(f, "{} is out of bounds: {} (expected {}..={})", what, value, min, max),
            Self::BadArgument {
                index,
                expected,
                found,
            } => write!(
                f,
                "bad argument #{} ({} expected, got {})",
                index, expected, found
            ),
            Self::InvalidColor { reason } => write!(f, "invalid color: {}", reason),
            Self::InvalidChannel => write!(f, "invalid logging::channel"),
            Self::UnknownFunction { name } => write!(f, "no such function: {}", name),
            Self::ModuleClosed => write!(f, "logging module is closed"),
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::ConfigParse { path, reason } => {
                write!(f, "Config parse error in {}: {}", path.display(), reason)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_invalid_severity() {
        let err = BridgeError::InvalidSeverity { value: 99.0 };
        assert_eq!(err.to_string(), "invalid logging severity: 99");
    }

    #[test]
    fn test_display_bad_argument() {
        let err = BridgeError::BadArgument {
            index: 2,
            expected: "number",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "bad argument #2 (number expected, got string)"
        );
    }

    #[test]
    fn test_config_read_has_source() {
        let err = BridgeError::ConfigRead {
            path: PathBuf::from("missing.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.toml"));
    }

    #[test]
    fn test_validation_errors_have_no_source() {
        assert!(BridgeError::InvalidChannel.source().is_none());
        assert!(BridgeError::ModuleClosed.source().is_none());
    }
}
