//! Diagnostic output abstractions
//!
//! [`DiagnosticSink`] is what the diagnostic gate protects. [`SerialPort`]
//! models the non-reentrant byte device behind it; [`SerialSink`] adapts
//! one into the other.

/// Line-oriented diagnostic output
pub trait DiagnosticSink {
    /// Write one line of text followed by a line terminator
    fn write_line(&mut self, line: &str);
}

/// Byte-oriented serial output device
///
/// Not reentrant: only one context may use it at a time.
pub trait SerialPort {
    /// Configure and enable the port
    fn begin(&mut self, config: SerialConfig);

    /// Queue one byte, returning the number of bytes accepted
    fn write(&mut self, byte: u8) -> usize;

    /// Wait until queued bytes have left the device
    fn flush(&mut self);
}

/// Serial frame configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// [`DiagnosticSink`] over a [`SerialPort`], CRLF terminated
pub struct SerialSink<P: SerialPort> {
    port: P,
}

impl<P: SerialPort> SerialSink<P> {
    /// Start the port with `config` and wrap it
    pub fn begin(mut port: P, config: SerialConfig) -> Self {
        port.begin(config);
        Self { port }
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            // Blocking devices accept every byte; a full FIFO drops it
            let _ = self.port.write(byte);
        }
    }
}

impl<P: SerialPort> DiagnosticSink for SerialSink<P> {
    fn write_line(&mut self, line: &str) {
        self.write_bytes(line.as_bytes());
        self.write_bytes(b"\r\n");
        self.port.flush();
    }
}
