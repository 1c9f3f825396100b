//! Log listener with a bounded message queue
//!
//! The host calls `LogListener::on_log_event` for every line it logs, from
//! any thread. `QueueListener` snapshots each line into a `LogMessage` and
//! keeps the newest ones in a `BoundedQueue` until a consumer drains them.

pub mod queue;

pub use queue::BoundedQueue;

use crate::constants::DEFAULT_MAX_QUEUE_SIZE;
use crate::host::ChannelId;
use crate::logging::{ChannelFlags, Color, LogMessage, Severity};
use parking_lot::Mutex;
use tracing::debug;

/// Attributes of a log event as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogContext {
    pub channel: ChannelId,
    pub severity: Severity,
    pub color: Color,
    pub flags: ChannelFlags,
}

/// Subscriber notified synchronously of every log event the host emits
pub trait LogListener: Send + Sync {
    /// Called on the host's logging path; must not block for long
    fn on_log_event(&self, context: &LogContext, text: &str);
}

/// Thread-safe listener capturing log lines into a bounded FIFO.
///
/// One mutex guards the queue and its capacity together, so
/// `len <= capacity` (outside of a capacity shrink) and FIFO order hold
/// across concurrent producers and consumers.
pub struct QueueListener {
    queue: Mutex<BoundedQueue<LogMessage>>,
}

impl QueueListener {
    pub fn new(max_queue_size: usize) -> Self {
        Self {
            queue: Mutex::new(BoundedQueue::new(max_queue_size)),
        }
    }

    /// Append a message, evicting the oldest when full
    pub fn push(&self, message: LogMessage) {
        self.queue.lock().push(message);
    }

    /// Remove and return up to `max` oldest messages, oldest first
    pub fn drain(&self, max: usize) -> Vec<LogMessage> {
        if max == 0 {
            return Vec::new();
        }
        self.queue.lock().drain(max)
    }

    /// Remove and return every queued message
    pub fn drain_all(&self) -> Vec<LogMessage> {
        self.queue.lock().drain_all()
    }

    /// Set the maximum queue size for future insertions.
    ///
    /// Does not truncate an already larger queue.
    pub fn set_max_queue_size(&self, max_queue_size: usize) {
        let len = {
            let mut queue = self.queue.lock();
            queue.set_capacity(max_queue_size);
            queue.len()
        };
        // Emitted after unlocking: the event may come back through on_log_event
        if max_queue_size < len {
            debug!(
                "Queue capacity lowered to {} below current size {}",
                max_queue_size, len
            );
        }
    }

    pub fn max_queue_size(&self) -> usize {
        self.queue.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Drop every queued message
    pub fn clear(&self) {
        self.queue.lock().clear();
    }
}

impl Default for QueueListener {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUEUE_SIZE)
    }
}

impl LogListener for QueueListener {
    fn on_log_event(&self, context: &LogContext, text: &str) {
        // Snapshot before taking the lock to keep the critical section short
        let message = LogMessage::new(
            context.severity,
            context.channel,
            context.color,
            context.flags,
            text,
        );
        self.push(message);
    }
}
