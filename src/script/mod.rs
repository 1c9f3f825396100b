//! Scripting surface
//!
//! - `value` - `ScriptValue` and argument marshaling
//! - `channel` - channel handle methods, fields and user tables
//! - `module` - the `logging` namespace and its lifecycle

pub mod channel;
pub mod module;
pub mod value;

pub use channel::{Field, UserTables, CHANNEL_METHODS};
pub use module::{LoggingModule, MODULE_FUNCTIONS};
pub use value::ScriptValue;
