//! WS2812 strand driver
//!
//! Thin wrapper over embassy-rp's PIO WS2812 program. One strand per PIO
//! state machine; the bit timing is entirely the PIO program's business.

use embassy_rp::dma::Channel;
use embassy_rp::pio::{Common, Instance, PioPin, StateMachine};
use embassy_rp::pio_programs::ws2812::{Grb, PioWs2812, PioWs2812Program};
use embassy_rp::Peri;
use smart_leds::RGB8;

/// One WS2812 output channel of `N` pixels
pub struct Strand<'d, PIO: Instance, const SM: usize, const N: usize> {
    driver: PioWs2812<'d, PIO, SM, N, Grb>,
    /// Last frame loaded, unscaled
    raw: [RGB8; N],
    /// Brightness-scaled output buffer
    scaled: [RGB8; N],
}

impl<'d, PIO: Instance, const SM: usize, const N: usize> Strand<'d, PIO, SM, N> {
    /// Create a strand on `sm`, sharing an already loaded `program`
    ///
    /// # Arguments
    /// * `common` - PIO common resources
    /// * `sm` - State machine to drive this strand
    /// * `dma` - DMA channel feeding the state machine
    /// * `pin` - Data pin (must be PIO-capable)
    /// * `program` - WS2812 program loaded once per PIO block
    pub fn new(
        common: &mut Common<'d, PIO>,
        sm: StateMachine<'d, PIO, SM>,
        dma: Peri<'d, impl Channel>,
        pin: Peri<'d, impl PioPin>,
        program: &PioWs2812Program<'d, PIO>,
    ) -> Self {
        Self {
            driver: PioWs2812::new(common, sm, dma, pin, program),
            raw: [RGB8::default(); N],
            scaled: [RGB8::default(); N],
        }
    }

    /// Pixel count
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Copy `frame` into the strand
    ///
    /// Only a copy, so it is cheap enough to run under a critical section.
    pub fn load(&mut self, frame: &[RGB8; N]) {
        self.raw.copy_from_slice(frame);
    }

    /// Scale the loaded frame by `brightness` and push it out
    ///
    /// Completes when the DMA transfer finishes. Dropping the future stops
    /// the transfer.
    pub async fn show(&mut self, brightness: u8) {
        let scaled = smart_leds::brightness(self.raw.iter().copied(), brightness);
        for (out, px) in self.scaled.iter_mut().zip(scaled) {
            *out = px;
        }
        self.driver.write(&self.scaled).await;
    }
}
