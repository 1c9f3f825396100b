//! Bounded FIFO with oldest-first eviction
//!
//! Pure data structure with no locking; `QueueListener` wraps it in a mutex.

use std::collections::VecDeque;

/// FIFO ring buffer holding at most `capacity` items.
///
/// Capacity only governs future insertions: lowering it below the current
/// length does not truncate. An oversized queue keeps its length (one
/// eviction per insertion) until drained.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Create an empty queue with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity,
        }
    }

    /// Append at the back, evicting the single oldest item when full.
    ///
    /// Returns the evicted item, if any. With a capacity of zero nothing is
    /// retained.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };

        if self.capacity > 0 {
            self.items.push_back(item);
        }
        evicted
    }

    /// Remove and return up to `max` oldest items, oldest first
    pub fn drain(&mut self, max: usize) -> Vec<T> {
        let count = max.min(self.items.len());
        self.items.drain(..count).collect()
    }

    /// Remove and return everything
    pub fn drain_all(&mut self) -> Vec<T> {
        self.items.drain(..).collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set capacity for future insertions (no truncation)
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Oldest-first view
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
