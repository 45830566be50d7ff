//! Render state shared between the trigger and the worker
//!
//! Every field is atomic. `busy` has a single writer (the worker);
//! `stall_count` and `next_check_ms` have a single writer (the trigger).
//! Everything may be read from any context.

use portable_atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};

/// Atomic render bookkeeping
#[derive(Debug)]
pub struct RenderState {
    /// A hardware flush is in flight
    busy: AtomicBool,
    /// Consecutive stall checks that found the worker busy
    stall_count: AtomicU32,
    /// Next time (ms) at which a busy worker is checked for a stall
    next_check_ms: AtomicU64,
    /// Brightness passed to each flush
    brightness: AtomicU8,
    /// Completed flushes (wrapping)
    flushes: AtomicU32,
}

impl RenderState {
    pub const fn new(brightness: u8) -> Self {
        Self {
            busy: AtomicBool::new(false),
            stall_count: AtomicU32::new(0),
            next_check_ms: AtomicU64::new(0),
            brightness: AtomicU8::new(brightness),
            flushes: AtomicU32::new(0),
        }
    }

    /// True while a flush is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub(crate) fn mark_busy(&self) {
        self.busy.store(true, Ordering::Release);
    }

    pub(crate) fn mark_idle(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Consecutive busy stall checks
    pub fn stall_count(&self) -> u32 {
        self.stall_count.load(Ordering::Acquire)
    }

    pub(crate) fn set_stall_count(&self, count: u32) {
        self.stall_count.store(count, Ordering::Release);
    }

    /// Next stall check deadline (ms)
    pub fn next_check_ms(&self) -> u64 {
        self.next_check_ms.load(Ordering::Acquire)
    }

    pub(crate) fn set_next_check_ms(&self, at_ms: u64) {
        self.next_check_ms.store(at_ms, Ordering::Release);
    }

    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    /// Takes effect on the next flush
    pub fn set_brightness(&self, brightness: u8) {
        self.brightness.store(brightness, Ordering::Relaxed);
    }

    /// Completed flushes since boot (wrapping)
    pub fn flushes(&self) -> u32 {
        self.flushes.load(Ordering::Relaxed)
    }

    pub(crate) fn record_flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = RenderState::default();
        assert!(!state.is_busy());
        assert_eq!(state.stall_count(), 0);
        assert_eq!(state.brightness(), 255);
        assert_eq!(state.flushes(), 0);
    }

    #[test]
    fn test_busy_toggles() {
        let state = RenderState::new(127);
        state.mark_busy();
        assert!(state.is_busy());
        state.mark_idle();
        assert!(!state.is_busy());
    }

    #[test]
    fn test_flush_counter_wraps() {
        let state = RenderState::default();
        state.flushes.store(u32::MAX, Ordering::Relaxed);
        state.record_flush();
        assert_eq!(state.flushes(), 0);
    }
}
