//! `logging` namespace exposed to scripts
//!
//! `LoggingModule` owns the queue listener and the channel user tables for
//! one load of the module. Opening registers the listener with the host,
//! closing unregisters it and drops everything the module captured.

use super::channel::{self, Field, UserTables};
use super::value::{arg, count_arg, number_arg, severity_arg, string_arg, ScriptValue};
use crate::config::Config;
use crate::constants::{NAMESPACE, VERSION, VERSION_NUM};
use crate::error::{BridgeError, Result};
use crate::host::LoggingHost;
use crate::listener::{LogListener, QueueListener};
use crate::logging::{ChannelFlags, LogMessage, Severity};
use crate::registry::{ChannelHandle, ChannelRegistry};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Functions callable on the namespace
pub const MODULE_FUNCTIONS: &[&str] = &[
    "Get",
    "GetAll",
    "SetMaximumQueueSize",
    "GetMaximumQueueSize",
    "GetChannelCount",
    "GetChannel",
    "GetChannels",
    "FindChannel",
    "SetChannelMinimumSeverityByName",
    "SetChannelMinimumSeverityByTag",
    "SetGlobalMinimumSeverity",
];

/// One loaded instance of the `logging` namespace
pub struct LoggingModule {
    host: Arc<dyn LoggingHost>,
    registry: ChannelRegistry,
    listener: Arc<QueueListener>,
    /// Same allocation as `listener`, as registered with the host
    registered: Arc<dyn LogListener>,
    user_tables: UserTables,
    default_get_count: usize,
    open: AtomicBool,
}

impl LoggingModule {
    /// Create the listener from `config` and register it with `host`
    pub fn open(host: Arc<dyn LoggingHost>, config: &Config) -> Self {
        let listener = Arc::new(QueueListener::new(config.listener.max_queue_size));
        let registered: Arc<dyn LogListener> = listener.clone();
        host.register_listener(registered.clone());
        debug!(
            "{} listener registered (max queue size {})",
            NAMESPACE, config.listener.max_queue_size
        );

        Self {
            registry: ChannelRegistry::new(host.clone()),
            host,
            listener,
            registered,
            user_tables: UserTables::default(),
            default_get_count: config.listener.default_get_count,
            open: AtomicBool::new(true),
        }
    }

    /// Unregister the listener and drop queued messages and user tables.
    ///
    /// Idempotent; later calls into the module fail with `ModuleClosed`.
    pub fn close(&self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            return;
        }
        self.host.unregister_listener(&self.registered);
        self.listener.clear();
        self.user_tables.clear();
        debug!("{} listener unregistered", NAMESPACE);
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(BridgeError::ModuleClosed)
        }
    }

    pub fn listener(&self) -> &Arc<QueueListener> {
        &self.listener
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    // === Namespace ===

    /// Constant fields of the namespace (version, severities, flags)
    pub fn constants() -> BTreeMap<String, ScriptValue> {
        let mut fields = BTreeMap::new();
        fields.insert("Version".to_string(), ScriptValue::from(VERSION));
        fields.insert("VersionNum".to_string(), ScriptValue::from(VERSION_NUM));

        for severity in Severity::ALL {
            fields.insert(severity.constant_name().to_string(), ScriptValue::from(severity));
        }

        fields.insert(
            "FLAGS_CONSOLE_ONLY".to_string(),
            ScriptValue::from(ChannelFlags::CONSOLE_ONLY),
        );
        fields.insert(
            "FLAGS_DO_NOT_ECHO".to_string(),
            ScriptValue::from(ChannelFlags::DO_NOT_ECHO),
        );
        fields
    }

    /// Call a namespace function by name
    pub fn call(&self, function: &str, args: &[ScriptValue]) -> Result<ScriptValue> {
        self.ensure_open()?;

        let value = match function {
            "Get" => {
                let count = match arg(args, 0) {
                    ScriptValue::Nil => self.default_get_count,
                    _ => count_arg(args, 0)?,
                };
                messages_value(self.listener.drain(count))
            }
            "GetAll" => messages_value(self.listener.drain_all()),
            "SetMaximumQueueSize" => {
                let size = count_arg(args, 0)?;
                debug!("Maximum queue size -> {}", size);
                self.listener.set_max_queue_size(size);
                ScriptValue::Nil
            }
            "GetMaximumQueueSize" => ScriptValue::from(self.listener.max_queue_size()),
            "GetChannelCount" => ScriptValue::from(self.registry.count()),
            "GetChannel" => {
                let id = number_arg(args, 0)?;
                if id.is_nan() {
                    return Ok(ScriptValue::Nil);
                }
                ScriptValue::from(self.registry.get_by_id(id.trunc() as i64))
            }
            "GetChannels" => ScriptValue::Sequence(
                self.registry
                    .enumerate()
                    .into_iter()
                    .map(ScriptValue::from)
                    .collect(),
            ),
            "FindChannel" => {
                let name = string_arg(args, 0)?;
                ScriptValue::from(self.registry.find_by_name(name))
            }
            "SetChannelMinimumSeverityByName" => {
                let name = string_arg(args, 0)?;
                let severity = severity_arg(args, 1)?;
                self.registry.set_minimum_severity_by_name(name, severity);
                ScriptValue::Nil
            }
            "SetChannelMinimumSeverityByTag" => {
                let tag = string_arg(args, 0)?;
                let severity = severity_arg(args, 1)?;
                self.registry.set_minimum_severity_by_tag(tag, severity);
                ScriptValue::Nil
            }
            "SetGlobalMinimumSeverity" => {
                let severity = severity_arg(args, 0)?;
                self.registry.set_global_minimum_severity(severity);
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

    // === Channel handles ===

    /// Call a method on a channel handle value
    pub fn call_method(
        &self,
        target: &ScriptValue,
        method: &str,
        args: &[ScriptValue],
    ) -> Result<ScriptValue> {
        self.ensure_open()?;
        let handle = handle_of(target)?;
        channel::call_method(&self.registry, &self.user_tables, handle, method, args)
    }

    /// Read a field on a channel handle (methods first, then user table)
    pub fn get_field(&self, target: &ScriptValue, key: &str) -> Result<Field> {
        self.ensure_open()?;
        Ok(channel::get_field(&self.user_tables, handle_of(target)?, key))
    }

    /// Write a field on a channel handle's user table
    pub fn set_field(&self, target: &ScriptValue, key: &str, value: ScriptValue) -> Result<()> {
        self.ensure_open()?;
        self.user_tables.set(handle_of(target)?, key, value);
        Ok(())
    }

    /// Script equality between two values
    pub fn equals(&self, left: &ScriptValue, right: &ScriptValue) -> bool {
        channel::channels_equal(left, right)
    }

    /// String form of a channel handle value
    pub fn to_string(&self, target: &ScriptValue) -> Result<String> {
        Ok(handle_of(target)?.to_string())
    }
}

impl Drop for LoggingModule {
    fn drop(&mut self) {
        self.close();
    }
}

fn handle_of(value: &ScriptValue) -> Result<&ChannelHandle> {
    value.as_channel().ok_or(BridgeError::InvalidChannel)
}

/// Drained batch as a sequence of message maps; nil when nothing was drained
fn messages_value(messages: Vec<LogMessage>) -> ScriptValue {
    if messages.is_empty() {
        return ScriptValue::Nil;
    }
    ScriptValue::Sequence(messages.iter().map(ScriptValue::from).collect())
}
