//! Diagnostic serial port on an RP2040 UART
//!
//! Transmit only. Writes block until the byte is in the UART FIFO, which
//! is acceptable because the diagnostic gate serializes all writers.

use embassy_rp::uart::{self, Blocking, UartTx};
use pixelwatch_core::traits::{DataBits, Parity, SerialConfig, SerialPort, StopBits};

/// Convert the board-agnostic serial configuration to an embassy-rp one
pub fn to_uart_config(config: &SerialConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// [`SerialPort`] over a blocking UART transmitter
///
/// The UART is configured when the transmitter is created (use
/// [`to_uart_config`]); `begin` only opens the port for writing. Bytes
/// written before `begin` are dropped.
pub struct UartSerial<'d> {
    tx: UartTx<'d, Blocking>,
    config: Option<SerialConfig>,
}

impl<'d> UartSerial<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self { tx, config: None }
    }
}

impl SerialPort for UartSerial<'_> {
    fn begin(&mut self, config: SerialConfig) {
        self.config = Some(config);
    }

    fn write(&mut self, byte: u8) -> usize {
        if self.config.is_none() {
            return 0;
        }
        match self.tx.blocking_write(&[byte]) {
            Ok(()) => 1,
            Err(_) => 0,
        }
    }

    fn flush(&mut self) {
        let _ = self.tx.blocking_flush();
    }
}
