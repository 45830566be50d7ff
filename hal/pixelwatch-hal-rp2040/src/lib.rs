//! RP2040-specific HAL for the pixelwatch firmware
//!
//! This crate provides RP2040 implementations of the `pixelwatch-core`
//! hardware traits:
//!
//! - WS2812 strands driven by PIO state machines with DMA
//! - Blocking UART transmitter as the diagnostic serial port
//! - System reset through the Cortex-M SCB

#![no_std]

pub mod reset;
pub mod uart;
pub mod ws2812;

pub use reset::ScbReset;
pub use uart::{to_uart_config, UartSerial};
pub use ws2812::Strand;
