//! Interrupt-safe event counter

use portable_atomic::{AtomicU32, Ordering};

/// Counts events raised from interrupt context
///
/// `increment` is the only method meant for interrupt handlers. The main
/// loop drains the count with [`take`](Self::take).
#[derive(Debug)]
pub struct EventCounter {
    count: AtomicU32,
}

impl EventCounter {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Record one event (wrapping)
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Events since the last `take`, resetting the count
    pub fn take(&self) -> u32 {
        self.count.swap(0, Ordering::Relaxed)
    }

    pub fn get(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }
}

impl Default for EventCounter {
    fn default() -> Self {
        Self::new()
    }
}
