//! Stall escalation ladder
//!
//! Explicit, finite state machine for a worker that stops returning from
//! its flush. Phase changes come from stall checks (one per check
//! interval while busy) and from observing the worker idle.

use crate::config::WatchdogConfig;

/// Where the worker sits on the escalation ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallPhase {
    /// No flush in flight
    Idle,
    /// Flush in flight, not yet stalled
    Busy,
    /// Busy for one full check interval; the re-notify step runs here
    StalledOnce,
    /// Still busy after the re-notify step
    StalledRepeated,
    /// Busy past the restart threshold
    Terminal,
}

/// Inputs to the ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallEvent {
    /// Trigger found the worker idle
    WorkerIdle,
    /// Trigger found the worker busy between checks
    WorkerBusy,
    /// A check interval elapsed with the worker busy
    CheckElapsed { stall_count: u32 },
}

/// Recovery step requested by a phase change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryAction {
    None,
    /// Unlock (if enabled) and wake the worker again
    Renotify,
    /// Full device restart
    Restart,
}

/// Ladder thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EscalationLadder {
    renotify_at: u32,
    restart_after: u32,
}

impl EscalationLadder {
    pub const fn new(renotify_at: u32, restart_after: u32) -> Self {
        Self {
            renotify_at,
            restart_after,
        }
    }

    pub fn from_config(config: &WatchdogConfig) -> Self {
        Self::new(config.renotify_at, config.restart_after)
    }

    /// Phase for a worker seen busy at a check with `stall_count`
    pub fn phase_for(&self, stall_count: u32) -> StallPhase {
        if stall_count > self.restart_after {
            StallPhase::Terminal
        } else if stall_count == self.renotify_at {
            StallPhase::StalledOnce
        } else if stall_count > self.renotify_at {
            StallPhase::StalledRepeated
        } else {
            StallPhase::Busy
        }
    }
}

impl Default for EscalationLadder {
    fn default() -> Self {
        Self::from_config(&WatchdogConfig::default())
    }
}

impl StallPhase {
    /// Process an event and return the next phase
    pub fn transition(self, event: StallEvent, ladder: &EscalationLadder) -> Self {
        use StallEvent::*;
        use StallPhase::*;

        match (self, event) {
            (_, WorkerIdle) => Idle,
            (Idle, WorkerBusy) => Busy,
            (_, WorkerBusy) => self,
            (_, CheckElapsed { stall_count }) => ladder.phase_for(stall_count),
        }
    }

    /// Action to run when moving from `self` to `next`
    ///
    /// Re-notify runs once on entering `StalledOnce`. Restart runs on every
    /// check that lands in `Terminal`, so a restart that somehow returns is
    /// retried.
    pub fn action_into(self, next: StallPhase) -> RecoveryAction {
        match (self, next) {
            (StallPhase::StalledOnce, StallPhase::StalledOnce) => RecoveryAction::None,
            (_, StallPhase::StalledOnce) => RecoveryAction::Renotify,
            (_, StallPhase::Terminal) => RecoveryAction::Restart,
            _ => RecoveryAction::None,
        }
    }

    pub fn is_stalled(&self) -> bool {
        matches!(
            self,
            StallPhase::StalledOnce | StallPhase::StalledRepeated | StallPhase::Terminal
        )
    }
}
