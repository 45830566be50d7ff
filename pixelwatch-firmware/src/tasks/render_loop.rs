//! Main render loop task
//!
//! Paints a new frame, ticks the render trigger, runs any recovery the
//! trigger asks for and emits the periodic loop report.

use defmt::*;
use embassy_time::{Delay, Instant, Timer};

use pixelwatch_core::config::SupervisorConfig;
use pixelwatch_core::recovery::{HangDetector, RecoveryAction, RecoveryOutcome};
use pixelwatch_core::render::{RenderTrigger, Tick};
use pixelwatch_core::stats::LoopReport;
use pixelwatch_core::timing::PacingGate;
use pixelwatch_hal_rp2040::ScbReset;

use crate::channels::{Gate, PULSES, RENDER};
use crate::demo::{paint_random, XorShift32};
use crate::display::{Frames, FRAMES};

fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Main render loop task
#[embassy_executor::task]
pub async fn render_loop_task(gate: &'static Gate, pacing: PacingGate, config: SupervisorConfig) {
    info!("Render loop started, pacing interval {} ms", pacing.interval_ms());

    let mut delay = Delay;
    let mut rng = XorShift32::new(Instant::now().as_ticks() as u32);
    // Painted outside the lock; FRAMES is a critical section on both cores
    let mut canvas = Frames::new();
    let mut trigger = RenderTrigger::new(&RENDER, pacing, &config.watchdog, now_ms());
    let mut detector = HangDetector::new(&RENDER, gate, ScbReset, config.watchdog);
    let mut report = (config.report.interval_ms > 0)
        .then(|| LoopReport::new(config.report.interval_ms, now_ms()));

    let boot_ms = now_ms();
    gate.emit(&mut delay, |out| {
        out.line(format_args!(
            "Initialisation complete {}.{:03} seconds after boot.",
            boot_ms / 1000,
            boot_ms % 1000
        ));
    })
    .await;

    loop {
        paint_random(&mut canvas, &mut rng);
        FRAMES.lock(|frames| frames.borrow_mut().copy_from(&canvas));
        Timer::after_millis(1).await;

        let now = now_ms();
        match trigger.tick(now) {
            Tick::Woke => trace!("Render worker woken at {} ms", now),
            Tick::Check {
                stall_count,
                action,
            } => {
                match action {
                    RecoveryAction::Renotify => {
                        warn!("Render flush jammed, stall count {}; re-notifying", stall_count)
                    }
                    RecoveryAction::Restart => {
                        error!("Render flush still jammed after {} checks, restarting", stall_count)
                    }
                    RecoveryAction::None if stall_count > 0 => {
                        debug!("Render worker still busy, stall count {}", stall_count)
                    }
                    RecoveryAction::None => {}
                }

                let outcome = detector.respond(action, stall_count, now, &mut delay).await;
                if let RecoveryOutcome::Renotified {
                    notice_logged: false,
                } = outcome
                {
                    warn!("Stall notice skipped, diagnostic gate busy");
                }
            }
            Tick::Idle | Tick::Busy => {}
        }

        if let Some(report) = report.as_mut() {
            report.record_loop();
            if report.due(now) {
                let snapshot = report.snapshot(now, PULSES.take(), RENDER.state().flushes());
                info!("Loop report: {}", snapshot);
                let logged = gate
                    .emit(&mut delay, |out| out.line(format_args!("{}", snapshot)))
                    .await;
                if !logged {
                    warn!("Loop report skipped, diagnostic gate busy");
                }
            }
        }

        embassy_futures::yield_now().await;
    }
}
