//! Hang detector
//!
//! Runs the recovery step chosen by the trigger's stall check. Runs on the
//! main loop, so its settle delays pause the loop the same way a blocking
//! delay would.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use super::ladder::RecoveryAction;
use crate::config::WatchdogConfig;
use crate::diag::{format_uptime, DiagnosticGate};
use crate::render::RenderShared;
use crate::traits::{DiagnosticSink, SystemReset};

/// What the detector did for one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecoveryOutcome {
    Nothing,
    /// Worker was unlocked (if enabled) and woken again
    Renotified {
        /// False if the diagnostic gate timed out and the notice was skipped
        notice_logged: bool,
    },
    /// Restart was requested and the reset returned (host resets only)
    Restarting,
}

/// Recovery escalator
pub struct HangDetector<'a, M: RawMutex, G: RawMutex, S, X> {
    shared: &'a RenderShared<M>,
    diagnostics: &'a DiagnosticGate<G, S>,
    reset: X,
    config: WatchdogConfig,
}

impl<'a, M, G, S, X> HangDetector<'a, M, G, S, X>
where
    M: RawMutex,
    G: RawMutex,
    S: DiagnosticSink,
    X: SystemReset,
{
    pub fn new(
        shared: &'a RenderShared<M>,
        diagnostics: &'a DiagnosticGate<G, S>,
        reset: X,
        config: WatchdogConfig,
    ) -> Self {
        Self {
            shared,
            diagnostics,
            reset,
            config,
        }
    }

    /// Carry out `action` for a check that reported `stall_count`
    pub async fn respond<D: DelayNs>(
        &mut self,
        action: RecoveryAction,
        stall_count: u32,
        now_ms: u64,
        delay: &mut D,
    ) -> RecoveryOutcome {
        match action {
            RecoveryAction::None => RecoveryOutcome::Nothing,
            RecoveryAction::Renotify => self.renotify(stall_count, now_ms, delay).await,
            RecoveryAction::Restart => self.restart(stall_count, now_ms, delay).await,
        }
    }

    async fn renotify<D: DelayNs>(
        &mut self,
        stall_count: u32,
        now_ms: u64,
        delay: &mut D,
    ) -> RecoveryOutcome {
        let uptime = format_uptime(now_ms / 1000);
        let force_unlock = self.config.force_unlock;
        let notice_logged = self
            .diagnostics
            .emit(delay, |out| {
                out.line(format_args!(""));
                out.line(format_args!(
                    "Render flush has jammed after {} since boot! (stall {})",
                    uptime, stall_count
                ));
                if force_unlock {
                    out.line(format_args!("Forcing flush unlock."));
                } else {
                    out.line(format_args!("Waiting for the flush to time out."));
                }
            })
            .await;
        self.diagnostics
            .paced_delay(delay, self.config.notice_settle_ms)
            .await;

        if force_unlock {
            self.shared.request_unlock();
        }
        delay.delay_ms(self.config.unlock_settle_ms).await;
        self.shared.notify();
        delay.delay_ms(self.config.renotify_settle_ms).await;

        RecoveryOutcome::Renotified { notice_logged }
    }

    async fn restart<D: DelayNs>(
        &mut self,
        stall_count: u32,
        now_ms: u64,
        delay: &mut D,
    ) -> RecoveryOutcome {
        let uptime = format_uptime(now_ms / 1000);
        self.diagnostics
            .emit(delay, |out| {
                out.line(format_args!(""));
                out.line(format_args!(
                    "Render flush still jammed after {} since boot (stall {}), restarting",
                    uptime, stall_count
                ));
            })
            .await;
        self.diagnostics
            .paced_delay(delay, self.config.notice_settle_ms)
            .await;

        // Hardware resets never return; only host resets get here
        self.reset.restart();
        RecoveryOutcome::Restarting
    }
}
