//! Random test pattern
//!
//! Gives the render worker something to flush.

use smart_leds::RGB8;

use crate::display::Frames;

/// xorshift32 generator
pub struct XorShift32(u32);

impl XorShift32 {
    /// Zero is a fixed point of xorshift, so it is replaced
    pub const fn new(seed: u32) -> Self {
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// Fill every pixel of every channel with a random color
pub fn paint_random(frames: &mut Frames, rng: &mut XorShift32) {
    for channel in frames.channels_mut() {
        for px in channel.iter_mut() {
            let [r, g, b, _] = rng.next_u32().to_le_bytes();
            *px = RGB8::new(r, g, b);
        }
    }
}
