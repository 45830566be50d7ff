//! System reset

use pixelwatch_core::traits::SystemReset;

/// Restart through the Cortex-M System Control Block
#[derive(Debug, Default, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScbReset;

impl SystemReset for ScbReset {
    fn restart(&mut self) {
        cortex_m::peripheral::SCB::sys_reset();
    }
}
