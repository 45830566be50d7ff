//! Pulse generator task
//!
//! Stands in for a busy timer interrupt: runs on the interrupt-priority
//! executor, toggles a pin and counts every tick so the main loop can
//! report the interrupt rate.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use crate::channels::PULSES;

/// Time between pulses
pub const PULSE_PERIOD_US: u64 = 50;

/// Pulse generator task
#[embassy_executor::task]
pub async fn pulse_task(mut pin: Output<'static>) {
    info!("Pulse generator started, period {} us", PULSE_PERIOD_US);

    let mut ticker = Ticker::every(Duration::from_micros(PULSE_PERIOD_US));

    loop {
        ticker.next().await;
        pin.toggle();
        PULSES.increment();
        pin.toggle();
    }
}
