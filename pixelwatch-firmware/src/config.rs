//! Compile-time display configuration
//!
//! The constants are generated by build.rs from display.toml, which it
//! validates first. Channel pixel counts are const generics of the strand
//! drivers, so they cannot be loaded at runtime.

use pixelwatch_core::config::{
    DiagnosticConfig, DisplayConfig, ReportConfig, SupervisorConfig, WatchdogConfig,
};

mod generated {
    include!(concat!(env!("OUT_DIR"), "/display_config.rs"));
}

pub use generated::*;

/// Number of display channels (one PIO state machine each)
pub const CHANNEL_COUNT: usize = CHANNEL_PIXELS.len();

/// Diagnostic gate settings
pub const fn diagnostic_config() -> DiagnosticConfig {
    DiagnosticConfig {
        enabled: DIAGNOSTICS_ENABLED,
        acquire_timeout_ms: ACQUIRE_TIMEOUT_MS,
        drain_delay_ms: DRAIN_DELAY_MS,
    }
}

/// Full supervisor configuration from display.toml
pub fn supervisor_config() -> SupervisorConfig {
    let mut channels = heapless::Vec::new();
    for pixels in CHANNEL_PIXELS {
        // MAX_CHANNELS exceeds the four PIO state machines
        let _ = channels.push(pixels);
    }

    SupervisorConfig {
        display: DisplayConfig {
            channels,
            brightness: BRIGHTNESS,
            stutter_reduction: STUTTER_REDUCTION,
        },
        watchdog: WatchdogConfig {
            check_interval_ms: CHECK_INTERVAL_MS,
            renotify_at: RENOTIFY_AT,
            restart_after: RESTART_AFTER,
            force_unlock: FORCE_UNLOCK,
            ..WatchdogConfig::default()
        },
        diagnostics: diagnostic_config(),
        report: ReportConfig {
            interval_ms: REPORT_INTERVAL_MS,
        },
    }
}
