//! Stall detection and recovery
//!
//! - [`ladder`]: the stall phase state machine
//! - [`detector`]: runs the recovery actions the ladder asks for

pub mod detector;
pub mod ladder;

pub use detector::{HangDetector, RecoveryOutcome};
pub use ladder::{EscalationLadder, RecoveryAction, StallEvent, StallPhase};
