//! Single-slot hand-off between a producer thread and the frame loop.

use parking_lot::Mutex;
use std::sync::Arc;

/// Holds at most one value: the most recent one published.
///
/// Publishing overwrites whatever the consumer has not yet taken, so the
/// consumer only ever sees the latest reading. Neither side waits on the
/// other beyond the few instructions the slot swap takes.
#[derive(Debug)]
pub struct LatestCell<T> {
    slot: Mutex<Option<T>>,
}

impl<T> LatestCell<T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Create an empty cell ready to be shared between threads.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Store `value`, replacing any value not yet taken.
    pub fn publish(&self, value: T) {
        *self.slot.lock() = Some(value);
    }

    /// Remove and return the latest value, if one arrived since the last take.
    pub fn take(&self) -> Option<T> {
        self.slot.lock().take()
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T> Default for LatestCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
