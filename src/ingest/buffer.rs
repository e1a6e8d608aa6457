//! Bounded tick buffer

use crate::feed::Tick;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of recent ticks shared by all symbols.
///
/// Appending to a full buffer evicts the oldest tick. All operations take a
/// single exclusive lock, so a draining reader never sees a torn state.
#[derive(Debug)]
pub struct IngestionBuffer {
    ticks: Mutex<VecDeque<Tick>>,
    capacity: usize,
}

impl IngestionBuffer {
    /// Create a buffer holding at most `capacity` ticks
    pub fn new(capacity: usize) -> Self {
        Self {
            ticks: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a tick, returning the evicted oldest tick if the buffer was full
    pub fn append(&self, tick: Tick) -> Option<Tick> {
        if self.capacity == 0 {
            return Some(tick);
        }
        let mut ticks = self.ticks.lock();
        let evicted = if ticks.len() >= self.capacity {
            ticks.pop_front()
        } else {
            None
        };
        ticks.push_back(tick);
        evicted
    }

    /// Ordered snapshot of the buffer, emptying it when `clear` is set
    pub fn drain(&self, clear: bool) -> Vec<Tick> {
        let mut ticks = self.ticks.lock();
        if clear {
            ticks.drain(..).collect()
        } else {
            ticks.iter().cloned().collect()
        }
    }

    pub fn len(&self) -> usize {
        self.ticks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
