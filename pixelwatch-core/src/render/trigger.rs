//! Render trigger
//!
//! Called once per main-loop iteration. Wakes an idle worker at most once
//! per pacing interval and, while the worker is busy, runs one stall check
//! per check interval. Never blocks; recovery work is returned to the
//! caller as a [`Tick::Check`] carrying the action to run.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::shared::RenderShared;
use crate::config::WatchdogConfig;
use crate::recovery::{EscalationLadder, RecoveryAction, StallEvent, StallPhase};
use crate::timing::PacingGate;

/// Result of one trigger tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Worker idle, pacing interval not yet elapsed
    Idle,
    /// Worker idle and woken
    Woke,
    /// Worker busy, no check due
    Busy,
    /// Worker busy at a check deadline
    Check {
        /// Stall count before this check incremented it
        stall_count: u32,
        action: RecoveryAction,
    },
}

/// Main-loop side of the render supervisor
pub struct RenderTrigger<'a, M: RawMutex> {
    shared: &'a RenderShared<M>,
    pacing: PacingGate,
    ladder: EscalationLadder,
    phase: StallPhase,
    check_interval_ms: u64,
}

impl<'a, M: RawMutex> RenderTrigger<'a, M> {
    /// Create a trigger
    ///
    /// The check deadline starts at `now_ms`, so the first tick that sees
    /// the worker busy runs a check (reporting a stall count of 0).
    pub fn new(
        shared: &'a RenderShared<M>,
        pacing: PacingGate,
        watchdog: &WatchdogConfig,
        now_ms: u64,
    ) -> Self {
        shared.state().set_next_check_ms(now_ms);
        Self {
            shared,
            pacing,
            ladder: EscalationLadder::from_config(watchdog),
            phase: StallPhase::Idle,
            check_interval_ms: watchdog.check_interval_ms,
        }
    }

    pub fn phase(&self) -> StallPhase {
        self.phase
    }

    /// Advance the trigger to `now_ms`
    pub fn tick(&mut self, now_ms: u64) -> Tick {
        let state = self.shared.state();

        if !state.is_busy() {
            state.set_stall_count(0);
            self.phase = self.phase.transition(StallEvent::WorkerIdle, &self.ladder);
            if self.pacing.ready(now_ms) {
                self.shared.notify();
                return Tick::Woke;
            }
            return Tick::Idle;
        }

        self.phase = self.phase.transition(StallEvent::WorkerBusy, &self.ladder);
        if now_ms < state.next_check_ms() {
            return Tick::Busy;
        }

        state.set_next_check_ms(now_ms.saturating_add(self.check_interval_ms));
        let stall_count = state.stall_count();
        let next = self
            .phase
            .transition(StallEvent::CheckElapsed { stall_count }, &self.ladder);
        let action = self.phase.action_into(next);
        self.phase = next;
        state.set_stall_count(stall_count.saturating_add(1));

        Tick::Check {
            stall_count,
            action,
        }
    }
}
