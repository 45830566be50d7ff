//! Periodic main-loop report
//!
//! Rates are averaged over the nominal report interval, not the time that
//! actually passed, so a late report slightly overstates them.

use core::fmt;

use crate::diag::format_uptime;

/// One report's worth of figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportSnapshot {
    pub uptime_secs: u64,
    /// Main-loop iterations per second, times 100
    pub loops_per_sec_x100: u64,
    pub interrupts_per_sec: u64,
    /// Completed flushes since boot
    pub flushes: u32,
}

impl fmt::Display for ReportSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Running continuously for {} after boot. Speed {}.{:02} loops per sec (int = {}/sec), {} flushes.",
            format_uptime(self.uptime_secs),
            self.loops_per_sec_x100 / 100,
            self.loops_per_sec_x100 % 100,
            self.interrupts_per_sec,
            self.flushes,
        )
    }
}

/// Loop counter with a report deadline
#[derive(Debug, Clone)]
pub struct LoopReport {
    interval_ms: u64,
    next_due_ms: u64,
    loops: u64,
}

impl LoopReport {
    /// Create a report; the first one is due at `now_ms`
    pub const fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            next_due_ms: now_ms,
            loops: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn loops(&self) -> u64 {
        self.loops
    }

    /// Count one main-loop iteration
    pub fn record_loop(&mut self) {
        self.loops = self.loops.saturating_add(1);
    }

    /// True once per interval; schedules the next report
    pub fn due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.interval_ms);
        true
    }

    /// Build a snapshot and start a new counting window
    pub fn snapshot(&mut self, now_ms: u64, interrupts: u32, flushes: u32) -> ReportSnapshot {
        let window_ms = self.interval_ms.max(1);
        let snap = ReportSnapshot {
            uptime_secs: now_ms / 1000,
            loops_per_sec_x100: self.loops.saturating_mul(100_000) / window_ms,
            interrupts_per_sec: u64::from(interrupts).saturating_mul(1000) / window_ms,
            flushes,
        };
        self.loops = 0;
        snap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::format_line;

    #[test]
    fn test_first_report_immediate_then_per_interval() {
        let mut report = LoopReport::new(60_000, 5);
        assert!(report.due(5));
        assert!(!report.due(30_000));
        assert!(!report.due(60_004));
        assert!(report.due(60_005));
    }

    #[test]
    fn test_snapshot_rates() {
        let mut report = LoopReport::new(60_000, 0);
        for _ in 0..45_123 {
            report.record_loop();
        }
        let snap = report.snapshot(120_000, 300_000, 4200);
        assert_eq!(snap.uptime_secs, 120);
        assert_eq!(snap.loops_per_sec_x100, 75_205);
        assert_eq!(snap.interrupts_per_sec, 5000);
        assert_eq!(report.loops(), 0);
    }

    #[test]
    fn test_snapshot_text() {
        let snap = ReportSnapshot {
            uptime_secs: 75,
            loops_per_sec_x100: 1205,
            interrupts_per_sec: 5000,
            flushes: 42,
        };
        let line = format_line(format_args!("{}", snap));
        assert_eq!(
            line.as_str(),
            "Running continuously for 01:15 minute(s) after boot. Speed 12.05 loops per sec (int = 5000/sec), 42 flushes."
        );
    }
}
