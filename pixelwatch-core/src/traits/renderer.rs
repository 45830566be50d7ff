//! Pixel renderer trait
//!
//! Boundary to the LED driver. The worker is the only caller of
//! [`PixelRenderer::flush`].

/// Render preconditions that make a flush meaningless
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreconditionError {
    /// The renderer has no pixels
    NoPixels,
    /// Wrong number of controllers registered
    ControllerCount { expected: usize, actual: usize },
}

/// Multi-channel pixel output
pub trait PixelRenderer {
    /// Number of output controllers (channels)
    fn controller_count(&self) -> usize;

    /// Total pixels across all controllers
    fn size(&self) -> usize;

    /// Push the current frame to the physical display
    ///
    /// May never complete if the underlying transfer wedges. Callers must
    /// tolerate the future being dropped mid-transfer.
    async fn flush(&mut self, brightness: u8);
}

/// Verify a renderer is set up the way the supervisor expects
pub fn check_preconditions<R: PixelRenderer>(
    renderer: &R,
    expected_controllers: usize,
) -> Result<(), PreconditionError> {
    if renderer.size() == 0 {
        return Err(PreconditionError::NoPixels);
    }
    let actual = renderer.controller_count();
    if actual != expected_controllers {
        return Err(PreconditionError::ControllerCount {
            expected: expected_controllers,
            actual,
        });
    }
    Ok(())
}
