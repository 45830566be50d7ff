//! Board-agnostic core logic for the pixelwatch firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (pixel renderer, serial port, reset)
//! - Frame-rate calculation and wake pacing
//! - Render trigger and worker
//! - Stall escalation and recovery
//! - Diagnostic output gate
//! - Runtime statistics
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod diag;
pub mod recovery;
pub mod render;
pub mod stats;
pub mod timing;
pub mod traits;
