//! Maximum flush frequency per output channel
//!
//! A WS2812-class link clocks 24 bits per pixel at 800 kbit/s, followed by
//! a latch gap. The slowest channel bounds how often a full flush can
//! usefully run.

/// Link bit rate (bits per second)
pub const BIT_RATE_HZ: f32 = 800_000.0;

/// Bits transmitted per pixel
pub const BITS_PER_PIXEL: f32 = 24.0;

/// Latch gap deduction, expressed as a frequency (50 us reset)
pub const RESET_OVERHEAD_HZ: f32 = 50.0 / 1_000_000.0;

/// Starting value of the running minimum
pub const FRAME_RATE_CEILING_HZ: f32 = 400.0;

/// Frame-rate calculation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameRateError {
    /// Channel registered with zero pixels
    EmptyChannel,
    /// Pacing requested before any channel was registered
    NoChannels,
}

/// Maximum flush frequency for a channel of `pixels` pixels
///
/// Returns `None` for an empty channel.
pub fn max_frequency_hz(pixels: u16) -> Option<f32> {
    if pixels == 0 {
        return None;
    }
    Some(BIT_RATE_HZ / BITS_PER_PIXEL / pixels as f32 - RESET_OVERHEAD_HZ)
}

/// A registered output channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelDescriptor {
    pixels: u16,
    max_frequency_hz: f32,
}

impl ChannelDescriptor {
    /// Pixel count on this channel
    pub fn pixels(&self) -> u16 {
        self.pixels
    }

    /// Highest flush rate this channel sustains
    pub fn max_frequency_hz(&self) -> f32 {
        self.max_frequency_hz
    }
}

/// Pacing derived from the slowest channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacingState {
    lowest_frequency_hz: f32,
    interval_ms: u32,
}

impl PacingState {
    /// Lowest maximum frequency across all channels
    pub fn lowest_frequency_hz(&self) -> f32 {
        self.lowest_frequency_hz
    }

    /// Minimum time between wakes, `floor(1000 / lowest)`
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Whole-Hz refresh cap, `floor(lowest)`
    pub fn max_refresh_hz(&self) -> u16 {
        // Truncation is floor for positive values
        self.lowest_frequency_hz as u16
    }
}

/// Running-minimum frame-rate calculator
///
/// Used only during setup. Registration takes `&mut self`, so the running
/// minimum can never be updated from two contexts at once.
#[derive(Debug, Clone)]
pub struct FrameRateCalculator {
    lowest_hz: f32,
    registered: usize,
}

impl Default for FrameRateCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRateCalculator {
    pub const fn new() -> Self {
        Self {
            lowest_hz: FRAME_RATE_CEILING_HZ,
            registered: 0,
        }
    }

    /// Register a channel and fold its frequency into the running minimum
    pub fn register(&mut self, pixels: u16) -> Result<ChannelDescriptor, FrameRateError> {
        let max_frequency_hz = max_frequency_hz(pixels).ok_or(FrameRateError::EmptyChannel)?;
        if max_frequency_hz < self.lowest_hz {
            self.lowest_hz = max_frequency_hz;
        }
        self.registered += 1;
        Ok(ChannelDescriptor {
            pixels,
            max_frequency_hz,
        })
    }

    /// Current running minimum
    pub fn lowest_frequency_hz(&self) -> f32 {
        self.lowest_hz
    }

    /// Number of channels registered so far
    pub fn registered(&self) -> usize {
        self.registered
    }

    /// Freeze the running minimum into a pacing state
    pub fn finish(&self) -> Result<PacingState, FrameRateError> {
        if self.registered == 0 {
            return Err(FrameRateError::NoChannels);
        }
        Ok(PacingState {
            lowest_frequency_hz: self.lowest_hz,
            interval_ms: (1000.0 / self.lowest_hz) as u32,
        })
    }
}
