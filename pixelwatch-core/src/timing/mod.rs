//! Frame timing
//!
//! Frame-rate limits per channel and the wake pacing derived from them.

pub mod frame_rate;
pub mod pacing;

pub use frame_rate::{
    max_frequency_hz, ChannelDescriptor, FrameRateCalculator, FrameRateError, PacingState,
};
pub use pacing::PacingGate;
