//! Wake rate limiting
//!
//! There is no point asking for a flush faster than the slowest channel
//! can deliver one.

use super::frame_rate::PacingState;

/// Rate limiter for worker wakes
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacingGate {
    /// Minimum time between wakes (ms); 0 means unpaced
    interval_ms: u64,
    /// Time of the last wake that was let through
    last_wake_ms: Option<u64>,
}

impl PacingGate {
    /// Gate that lets a wake through at most once per `interval_ms`
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_wake_ms: None,
        }
    }

    /// Gate paced by the slowest channel
    pub fn from_pacing(pacing: &PacingState) -> Self {
        Self::new(pacing.interval_ms() as u64)
    }

    /// Gate that lets every wake through
    pub const fn unpaced() -> Self {
        Self::new(0)
    }

    /// Configured interval (ms)
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Returns true if a wake may be sent at `now_ms`, and records it
    ///
    /// The first call always passes.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = match self.last_wake_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_wake_ms = Some(now_ms);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_call_passes() {
        let mut gate = PacingGate::new(14);
        assert!(gate.ready(0));
        assert!(!gate.ready(13));
        assert!(gate.ready(14));
    }

    #[test]
    fn test_unpaced_always_passes() {
        let mut gate = PacingGate::unpaced();
        assert!(gate.ready(5));
        assert!(gate.ready(5));
        assert!(gate.ready(6));
    }

    #[test]
    fn test_interval_measured_from_last_pass() {
        let mut gate = PacingGate::new(10);
        assert!(gate.ready(100));
        assert!(!gate.ready(105));
        assert!(gate.ready(117));
        // Next window starts at 117, not 110
        assert!(!gate.ready(120));
        assert!(gate.ready(127));
    }

    proptest! {
        #[test]
        fn prop_at_most_one_wake_per_interval(
            interval in 1u64..50,
            steps in proptest::collection::vec(0u64..50, 1..200),
        ) {
            let mut gate = PacingGate::new(interval);
            let mut now = 0u64;
            let mut passes = std::vec::Vec::new();
            for step in steps {
                now += step;
                if gate.ready(now) {
                    passes.push(now);
                }
            }
            for pair in passes.windows(2) {
                prop_assert!(pair[1] - pair[0] >= interval);
            }
        }
    }
}
