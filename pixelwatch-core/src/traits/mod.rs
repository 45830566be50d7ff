//! Hardware abstraction traits
//!
//! These traits define the interface between the supervisor logic and
//! hardware-specific implementations.

pub mod renderer;
pub mod reset;
pub mod sink;

pub use renderer::{check_preconditions, PixelRenderer, PreconditionError};
pub use reset::SystemReset;
pub use sink::{DataBits, DiagnosticSink, Parity, SerialConfig, SerialPort, SerialSink, StopBits};
