//! Device restart trait

/// Full device restart
pub trait SystemReset {
    /// Restart the device
    ///
    /// Hardware implementations never return. The signature returns so
    /// host-side implementations can record the request instead.
    fn restart(&mut self);
}

impl<T: SystemReset + ?Sized> SystemReset for &mut T {
    fn restart(&mut self) {
        (**self).restart();
    }
}
