//! Configuration type definitions
//!
//! These types describe the display channels, the stall watchdog and the
//! diagnostic output. Defaults match the reference board.

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum output channels per display
pub const MAX_CHANNELS: usize = 8;

/// Display channel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Pixel count per channel, in registration order
    pub channels: Vec<u16, MAX_CHANNELS>,
    /// Brightness passed to every flush (0-255)
    pub brightness: u8,
    /// Rate-limit wakes to the slowest channel's frame rate
    pub stutter_reduction: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let mut channels = Vec::new();
        for pixels in [256, 256, 470, 470] {
            let _ = channels.push(pixels);
        }
        Self {
            channels,
            brightness: 255,
            stutter_reduction: true,
        }
    }
}

/// Stall watchdog configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WatchdogConfig {
    /// Period between stall checks while the worker is busy (ms)
    pub check_interval_ms: u64,
    /// Stall count at which the worker is re-notified
    pub renotify_at: u32,
    /// Restart once the stall count exceeds this value
    pub restart_after: u32,
    /// Race each flush against the unlock signal
    pub force_unlock: bool,
    /// Pause after a stall notice (ms)
    pub notice_settle_ms: u32,
    /// Pause between unlock and re-notify (ms)
    pub unlock_settle_ms: u32,
    /// Pause after re-notifying the worker (ms)
    pub renotify_settle_ms: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 1000,
            renotify_at: 1,
            restart_after: 15,
            force_unlock: true,
            notice_settle_ms: 500,
            unlock_settle_ms: 1,
            renotify_settle_ms: 50,
        }
    }
}

/// Diagnostic output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosticConfig {
    /// Master switch; when false nothing reaches the sink
    pub enabled: bool,
    /// Bounded wait for the gate (ms)
    pub acquire_timeout_ms: u32,
    /// Delay before releasing the gate so the device can drain (ms)
    pub drain_delay_ms: u32,
}

impl DiagnosticConfig {
    /// Diagnostics switched off
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            acquire_timeout_ms: 0,
            drain_delay_ms: 0,
        }
    }
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            acquire_timeout_ms: 1000,
            drain_delay_ms: 50,
        }
    }
}

/// Periodic status report configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportConfig {
    /// Time between reports (ms); 0 disables reporting
    pub interval_ms: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { interval_ms: 60_000 }
    }
}

/// Complete supervisor configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SupervisorConfig {
    pub display: DisplayConfig,
    pub watchdog: WatchdogConfig,
    pub diagnostics: DiagnosticConfig,
    pub report: ReportConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No display channels configured
    NoChannels,
    /// A channel has zero pixels
    EmptyChannel { index: usize },
    /// Stall checks need a non-zero period
    ZeroCheckInterval,
    /// Restart threshold must sit above the re-notify threshold
    ThresholdOrder { renotify_at: u32, restart_after: u32 },
}

impl SupervisorConfig {
    /// Check the configuration for values the supervisor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if let Some(index) = self.display.channels.iter().position(|&p| p == 0) {
            return Err(ConfigError::EmptyChannel { index });
        }
        if self.watchdog.check_interval_ms == 0 {
            return Err(ConfigError::ZeroCheckInterval);
        }
        if self.watchdog.restart_after < self.watchdog.renotify_at {
            return Err(ConfigError::ThresholdOrder {
                renotify_at: self.watchdog.renotify_at,
                restart_after: self.watchdog.restart_after,
            });
        }
        Ok(())
    }

    /// Total pixels across all channels
    pub fn total_pixels(&self) -> usize {
        self.display.channels.iter().map(|&p| p as usize).sum()
    }
}
