//! Supervisor bundle injected into the trigger, worker and hang detector
//!
//! One `RenderShared` lives for the whole run (a `static` on hardware, a
//! local in tests). It owns the render state and the three single-slot
//! signals that connect the execution contexts.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, Ordering};

use super::state::RenderState;

/// Pause/resume control for the worker
///
/// While held, the worker will not start a flush. It waits on the resume
/// signal instead of spinning.
pub struct HoldGate<M: RawMutex> {
    held: AtomicBool,
    resumed: Signal<M, ()>,
}

impl<M: RawMutex> HoldGate<M> {
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
            resumed: Signal::new(),
        }
    }

    /// Block flushes until [`release`](Self::release)
    pub fn hold(&self) {
        self.held.store(true, Ordering::Release);
    }

    /// Allow flushes again and wake a waiting worker
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
        self.resumed.signal(());
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Resolve once the gate is not held
    pub async fn wait_released(&self) {
        while self.is_held() {
            // A stale resume from an earlier release only costs one loop
            self.resumed.wait().await;
        }
    }
}

impl<M: RawMutex> Default for HoldGate<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared render supervisor state
pub struct RenderShared<M: RawMutex> {
    state: RenderState,
    /// Trigger → worker wake; at most one pending
    wake: Signal<M, ()>,
    /// Hang detector → worker: abandon the in-flight flush
    unlock: Signal<M, ()>,
    hold: HoldGate<M>,
}

impl<M: RawMutex> RenderShared<M> {
    pub const fn new(brightness: u8) -> Self {
        Self {
            state: RenderState::new(brightness),
            wake: Signal::new(),
            unlock: Signal::new(),
            hold: HoldGate::new(),
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn hold(&self) -> &HoldGate<M> {
        &self.hold
    }

    /// Wake the worker; repeated calls before it runs collapse into one
    pub fn notify(&self) {
        self.wake.signal(());
    }

    /// True if a wake is waiting to be consumed
    pub fn wake_pending(&self) -> bool {
        self.wake.signaled()
    }

    pub(crate) async fn wait_for_wake(&self) {
        self.wake.wait().await;
    }

    /// Ask the worker to abandon a stuck flush
    pub fn request_unlock(&self) {
        self.unlock.signal(());
    }

    pub(crate) fn clear_unlock(&self) {
        self.unlock.reset();
    }

    pub(crate) async fn wait_for_unlock(&self) {
        self.unlock.wait().await;
    }
}

impl<M: RawMutex> Default for RenderShared<M> {
    fn default() -> Self {
        Self::new(u8::MAX)
    }
}
