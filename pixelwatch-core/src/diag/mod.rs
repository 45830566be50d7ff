//! Diagnostic output
//!
//! Serializes diagnostic text from every context that writes it.

pub mod format;
pub mod gate;

pub use format::{format_line, format_uptime, Line, LINE_CAPACITY};
pub use gate::{DiagnosticGate, GateGuard};
