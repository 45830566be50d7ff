//! Shared test fixtures: a simulated millisecond clock and recording
//! stand-ins for the hardware traits.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::pending;
use std::rc::Rc;

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use pixelwatch_core::traits::{DiagnosticSink, PixelRenderer, SystemReset};

/// Millisecond clock advanced by [`SimClock::run`]
#[derive(Clone, Default)]
pub struct SimClock {
    now_ms: Rc<Cell<u64>>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            clock: self.clone(),
        }
    }

    /// Advance one millisecond per poll for `ms` polls
    pub async fn run_for(&self, ms: u64) {
        for _ in 0..ms {
            self.now_ms.set(self.now_ms.get() + 1);
            yield_now().await;
        }
    }

    /// Advance one millisecond per poll, forever
    pub async fn run(&self) -> ! {
        loop {
            self.now_ms.set(self.now_ms.get() + 1);
            yield_now().await;
        }
    }

    async fn sleep_until(&self, until_ms: u64) {
        while self.now() < until_ms {
            yield_now().await;
        }
    }
}

/// Delay driven by a [`SimClock`]
#[derive(Clone)]
pub struct SimDelay {
    clock: SimClock,
}

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let ms = u64::from(ns).div_ceil(1_000_000);
        self.clock.sleep_until(self.clock.now() + ms).await;
    }

    async fn delay_us(&mut self, us: u32) {
        let ms = u64::from(us).div_ceil(1_000);
        self.clock.sleep_until(self.clock.now() + ms).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.sleep_until(self.clock.now() + u64::from(ms)).await;
    }
}

/// Sink that keeps every line written to it
#[derive(Clone, Default)]
pub struct RecordingSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

impl DiagnosticSink for RecordingSink {
    fn write_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(String::from(line));
    }
}

/// Reset that records the time of each restart request
#[derive(Clone)]
pub struct RecordingReset {
    clock: SimClock,
    restarts: Rc<RefCell<Vec<u64>>>,
}

impl RecordingReset {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            restarts: Rc::default(),
        }
    }

    pub fn restarts(&self) -> Vec<u64> {
        self.restarts.borrow().clone()
    }
}

impl SystemReset for RecordingReset {
    fn restart(&mut self) {
        self.restarts.borrow_mut().push(self.clock.now());
    }
}

pub const CONTROLLERS: usize = 4;
pub const PIXELS: usize = 1452;

/// Renderer whose flushes take `hang_ms` while `hangs_left` is non-zero,
/// then complete at once. `hang_ms == u64::MAX` wedges forever.
pub struct ScriptedRenderer {
    delay: SimDelay,
    hang_ms: u64,
    hangs_left: u32,
    pub flushes: Rc<Cell<u32>>,
}

impl ScriptedRenderer {
    pub fn wedged(clock: &SimClock) -> Self {
        Self::hanging(clock, u64::MAX, u32::MAX)
    }

    pub fn hanging(clock: &SimClock, hang_ms: u64, hangs: u32) -> Self {
        Self {
            delay: clock.delay(),
            hang_ms,
            hangs_left: hangs,
            flushes: Rc::default(),
        }
    }
}

impl PixelRenderer for ScriptedRenderer {
    fn controller_count(&self) -> usize {
        CONTROLLERS
    }

    fn size(&self) -> usize {
        PIXELS
    }

    async fn flush(&mut self, _brightness: u8) {
        if self.hangs_left > 0 {
            self.hangs_left -= 1;
            if self.hang_ms == u64::MAX {
                pending::<()>().await;
            }
            let until = self.delay.clock.now() + self.hang_ms;
            self.delay.clock.sleep_until(until).await;
        }
        self.flushes.set(self.flushes.get() + 1);
    }
}
