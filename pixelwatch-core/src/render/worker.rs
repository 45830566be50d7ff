//! Render worker
//!
//! Owns the renderer and performs the blocking flush, one per wake. Runs
//! on its own executor (core 1 on hardware) so a wedged flush only ever
//! stalls this task.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;

use super::shared::RenderShared;
use crate::traits::{check_preconditions, PixelRenderer};

/// How a single flush ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushOutcome {
    /// The renderer returned normally
    Completed,
    /// The flush was abandoned on an unlock request
    Unlocked,
}

/// Background flush task state
pub struct RenderWorker<'a, M: RawMutex, R> {
    shared: &'a RenderShared<M>,
    renderer: R,
    expected_controllers: usize,
    unlock_enabled: bool,
}

impl<'a, M: RawMutex, R: PixelRenderer> RenderWorker<'a, M, R> {
    /// Create a worker
    ///
    /// `expected_controllers` is checked before every flush. With
    /// `unlock_enabled` the flush can be abandoned by
    /// [`RenderShared::request_unlock`].
    pub fn new(
        shared: &'a RenderShared<M>,
        renderer: R,
        expected_controllers: usize,
        unlock_enabled: bool,
    ) -> Self {
        Self {
            shared,
            renderer,
            expected_controllers,
            unlock_enabled,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Serve wakes forever
    pub async fn run(mut self) -> ! {
        loop {
            self.render_once().await;
        }
    }

    /// Wait for one wake and perform one flush
    ///
    /// # Panics
    ///
    /// Panics if the renderer fails its preconditions. A misconfigured
    /// display is not recoverable at runtime.
    pub async fn render_once(&mut self) -> FlushOutcome {
        self.shared.wait_for_wake().await;

        // An unlock aimed at a previous flush must not cancel this one
        self.shared.clear_unlock();
        let state = self.shared.state();
        state.mark_busy();

        embassy_futures::yield_now().await;
        self.shared.hold().wait_released().await;

        if let Err(e) = check_preconditions(&self.renderer, self.expected_controllers) {
            panic!("render preconditions failed: {:?}", e);
        }

        let brightness = state.brightness();
        let outcome = if self.unlock_enabled {
            match select(
                self.renderer.flush(brightness),
                self.shared.wait_for_unlock(),
            )
            .await
            {
                Either::First(()) => FlushOutcome::Completed,
                Either::Second(()) => FlushOutcome::Unlocked,
            }
        } else {
            self.renderer.flush(brightness).await;
            FlushOutcome::Completed
        };

        state.mark_idle();
        if outcome == FlushOutcome::Completed {
            state.record_flush();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::pending;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_futures::yield_now;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    struct CountingRenderer {
        controllers: usize,
        pixels: usize,
        flushed: u32,
        last_brightness: u8,
    }

    impl CountingRenderer {
        fn new(controllers: usize, pixels: usize) -> Self {
            Self {
                controllers,
                pixels,
                flushed: 0,
                last_brightness: 0,
            }
        }
    }

    impl PixelRenderer for CountingRenderer {
        fn controller_count(&self) -> usize {
            self.controllers
        }

        fn size(&self) -> usize {
            self.pixels
        }

        async fn flush(&mut self, brightness: u8) {
            self.last_brightness = brightness;
            self.flushed += 1;
        }
    }

    struct WedgedRenderer;

    impl PixelRenderer for WedgedRenderer {
        fn controller_count(&self) -> usize {
            4
        }

        fn size(&self) -> usize {
            1452
        }

        async fn flush(&mut self, _brightness: u8) {
            pending::<()>().await
        }
    }

    #[test]
    fn test_flush_completes_and_goes_idle() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::new(80);
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(4, 10), 4, true);

        shared.notify();
        let outcome = block_on(worker.render_once());

        assert_eq!(outcome, FlushOutcome::Completed);
        assert!(!shared.state().is_busy());
        assert_eq!(shared.state().flushes(), 1);
        assert_eq!(worker.renderer().flushed, 1);
        assert_eq!(worker.renderer().last_brightness, 80);
    }

    #[test]
    fn test_brightness_set_after_construction_reaches_flush() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::new(0);
        shared.state().set_brightness(127);
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(4, 10), 4, true);

        shared.notify();
        block_on(worker.render_once());

        assert_eq!(worker.renderer().last_brightness, 127);
    }

    #[test]
    fn test_unlock_abandons_wedged_flush() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::default();
        let mut worker = RenderWorker::new(&shared, WedgedRenderer, 4, true);

        shared.notify();
        let (outcome, ()) = block_on(join(worker.render_once(), async {
            while !shared.state().is_busy() {
                yield_now().await;
            }
            yield_now().await;
            shared.request_unlock();
        }));

        assert_eq!(outcome, FlushOutcome::Unlocked);
        assert!(!shared.state().is_busy());
        assert_eq!(shared.state().flushes(), 0);
    }

    #[test]
    fn test_stale_unlock_is_cleared() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::default();
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(4, 10), 4, true);

        shared.request_unlock();
        shared.notify();
        let outcome = block_on(worker.render_once());
        assert_eq!(outcome, FlushOutcome::Completed);
    }

    #[test]
    fn test_busy_while_held() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::default();
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(4, 10), 4, false);

        shared.hold().hold();
        shared.notify();
        let (outcome, ()) = block_on(join(worker.render_once(), async {
            for _ in 0..8 {
                yield_now().await;
                assert!(shared.state().is_busy());
            }
            shared.hold().release();
        }));

        assert_eq!(outcome, FlushOutcome::Completed);
        assert_eq!(worker.renderer().flushed, 1);
    }

    #[test]
    #[should_panic(expected = "render preconditions failed")]
    fn test_wrong_controller_count_panics() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::default();
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(3, 10), 4, true);
        shared.notify();
        block_on(worker.render_once());
    }

    #[test]
    #[should_panic(expected = "render preconditions failed")]
    fn test_empty_renderer_panics() {
        let shared: RenderShared<NoopRawMutex> = RenderShared::default();
        let mut worker = RenderWorker::new(&shared, CountingRenderer::new(4, 0), 4, true);
        shared.notify();
        block_on(worker.render_once());
    }
}
