//! Shared state between the execution contexts
//!
//! The render worker runs on core 1, the main loop on core 0 and the pulse
//! generator in an interrupt-priority executor, so everything here uses
//! `CriticalSectionRawMutex` or atomics.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;

use pixelwatch_core::diag::DiagnosticGate;
use pixelwatch_core::render::RenderShared;
use pixelwatch_core::stats::EventCounter;
use pixelwatch_core::traits::SerialSink;
use pixelwatch_hal_rp2040::UartSerial;

/// Diagnostic gate over the UART0 serial port
pub type Gate = DiagnosticGate<CriticalSectionRawMutex, SerialSink<UartSerial<'static>>>;

/// Render supervisor state and signals (trigger, worker, hang detector)
///
/// Starts dark; `main` applies the configured brightness before the worker
/// is spawned.
pub static RENDER: RenderShared<CriticalSectionRawMutex> = RenderShared::new(0);

/// Events raised by the pulse generator
pub static PULSES: EventCounter = EventCounter::new();

/// Diagnostic gate, created once the UART is up
pub static GATE: StaticCell<Gate> = StaticCell::new();
