//! Diagnostic output gate
//!
//! A single-holder lock around the diagnostic sink with a bounded wait.
//! Every diagnostic block follows the same shape:
//!
//! ```rust,ignore
//! if let Some(mut out) = gate.acquire(&mut delay).await {
//!     out.line(format_args!("flushes: {}", n));
//!     out.release(&mut delay).await;
//! }
//! ```
//!
//! A caller that does not get the gate skips its block. Dropping a guard
//! always releases the gate, so early returns cannot leak ownership;
//! [`GateGuard::release`] additionally waits for the device to drain.

use core::fmt;
use core::ops::{Deref, DerefMut};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_hal_async::delay::DelayNs;

use super::format::format_line;
use crate::config::DiagnosticConfig;
use crate::traits::DiagnosticSink;

/// Mutual-exclusion gate guarding a non-reentrant diagnostic sink
pub struct DiagnosticGate<M: RawMutex, S> {
    sink: Mutex<M, S>,
    config: DiagnosticConfig,
}

impl<M: RawMutex, S: DiagnosticSink> DiagnosticGate<M, S> {
    /// Create the gate in the available state
    pub const fn new(sink: S, config: DiagnosticConfig) -> Self {
        Self {
            sink: Mutex::new(sink),
            config,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Acquire with the configured timeout
    pub async fn acquire<D: DelayNs>(&self, delay: &mut D) -> Option<GateGuard<'_, M, S>> {
        self.acquire_within(delay, self.config.acquire_timeout_ms)
            .await
    }

    /// Try to take the gate within `timeout_ms`
    ///
    /// Returns `None` on timeout or when diagnostics are disabled; the
    /// gate is left untouched in both cases.
    pub async fn acquire_within<D: DelayNs>(
        &self,
        delay: &mut D,
        timeout_ms: u32,
    ) -> Option<GateGuard<'_, M, S>> {
        if !self.config.enabled {
            return None;
        }
        match select(self.sink.lock(), delay.delay_ms(timeout_ms)).await {
            Either::First(guard) => Some(GateGuard {
                guard,
                drain_delay_ms: self.config.drain_delay_ms,
            }),
            Either::Second(()) => None,
        }
    }

    /// Run `f` inside a guarded block
    ///
    /// Returns false if the gate could not be taken and `f` was skipped.
    pub async fn emit<D, F>(&self, delay: &mut D, f: F) -> bool
    where
        D: DelayNs,
        F: FnOnce(&mut GateGuard<'_, M, S>),
    {
        match self.acquire(delay).await {
            Some(mut guard) => {
                f(&mut guard);
                guard.release(delay).await;
                true
            }
            None => false,
        }
    }

    /// Delay that only happens while diagnostics are enabled
    pub async fn paced_delay<D: DelayNs>(&self, delay: &mut D, ms: u32) {
        if self.config.enabled {
            delay.delay_ms(ms).await;
        }
    }
}

/// Proof of gate ownership; derefs to the sink
pub struct GateGuard<'a, M: RawMutex, S> {
    guard: MutexGuard<'a, M, S>,
    drain_delay_ms: u32,
}

impl<M: RawMutex, S: DiagnosticSink> GateGuard<'_, M, S> {
    /// Write a formatted line to the sink
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        let line = format_line(args);
        self.guard.write_line(&line);
    }

    /// Let the device drain, then give the gate back
    pub async fn release<D: DelayNs>(self, delay: &mut D) {
        delay.delay_ms(self.drain_delay_ms).await;
        drop(self);
    }
}

impl<M: RawMutex, S> Deref for GateGuard<'_, M, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.guard
    }
}

impl<M: RawMutex, S> DerefMut for GateGuard<'_, M, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.guard
    }
}
