//! Physical display: four WS2812 strands on PIO0
//!
//! The main loop paints a private [`Frames`] and copies it into [`FRAMES`];
//! the render worker copies a snapshot into each strand, then scales and
//! pushes all four out in parallel. The lock only ever covers the copies.

use core::cell::RefCell;

use embassy_futures::join::join4;
use embassy_rp::peripherals::PIO0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use pixelwatch_core::traits::PixelRenderer;
use pixelwatch_hal_rp2040::Strand;
use smart_leds::RGB8;

use crate::config::{
    CHANNEL_0_PIXELS as N0, CHANNEL_1_PIXELS as N1, CHANNEL_2_PIXELS as N2,
    CHANNEL_3_PIXELS as N3, CHANNEL_COUNT,
};

/// Pixel data for every channel
pub struct Frames {
    pub ch0: [RGB8; N0],
    pub ch1: [RGB8; N1],
    pub ch2: [RGB8; N2],
    pub ch3: [RGB8; N3],
}

impl Frames {
    const BLACK: RGB8 = RGB8::new(0, 0, 0);

    /// All pixels off
    pub const fn new() -> Self {
        Self {
            ch0: [Self::BLACK; N0],
            ch1: [Self::BLACK; N1],
            ch2: [Self::BLACK; N2],
            ch3: [Self::BLACK; N3],
        }
    }

    /// Copy every channel from `other`
    pub fn copy_from(&mut self, other: &Frames) {
        self.ch0.copy_from_slice(&other.ch0);
        self.ch1.copy_from_slice(&other.ch1);
        self.ch2.copy_from_slice(&other.ch2);
        self.ch3.copy_from_slice(&other.ch3);
    }

    /// Every channel as a mutable slice, in channel order
    pub fn channels_mut(&mut self) -> [&mut [RGB8]; CHANNEL_COUNT] {
        [
            &mut self.ch0[..],
            &mut self.ch1[..],
            &mut self.ch2[..],
            &mut self.ch3[..],
        ]
    }
}

/// Frame buffer shared between the painter and the render worker
pub static FRAMES: Mutex<CriticalSectionRawMutex, RefCell<Frames>> =
    Mutex::new(RefCell::new(Frames::new()));

/// [`PixelRenderer`] over the four strands
pub struct DisplayRenderer {
    s0: Strand<'static, PIO0, 0, N0>,
    s1: Strand<'static, PIO0, 1, N1>,
    s2: Strand<'static, PIO0, 2, N2>,
    s3: Strand<'static, PIO0, 3, N3>,
}

impl DisplayRenderer {
    pub fn new(
        s0: Strand<'static, PIO0, 0, N0>,
        s1: Strand<'static, PIO0, 1, N1>,
        s2: Strand<'static, PIO0, 2, N2>,
        s3: Strand<'static, PIO0, 3, N3>,
    ) -> Self {
        Self { s0, s1, s2, s3 }
    }
}

impl PixelRenderer for DisplayRenderer {
    fn controller_count(&self) -> usize {
        CHANNEL_COUNT
    }

    fn size(&self) -> usize {
        self.s0.len() + self.s1.len() + self.s2.len() + self.s3.len()
    }

    async fn flush(&mut self, brightness: u8) {
        FRAMES.lock(|frames| {
            let frames = frames.borrow();
            self.s0.load(&frames.ch0);
            self.s1.load(&frames.ch1);
            self.s2.load(&frames.ch2);
            self.s3.load(&frames.ch3);
        });
        join4(
            self.s0.show(brightness),
            self.s1.show(brightness),
            self.s2.show(brightness),
            self.s3.show(brightness),
        )
        .await;
    }
}
