//! pixelwatch - hang-tolerant WS2812 display firmware
//!
//! Main firmware binary for RP2040 boards driving four WS2812 channels.
//! The blocking flush runs on core 1; core 0 runs the render loop that
//! paces it, notices when it jams and restarts the device if it stays
//! jammed. A pulse generator on an interrupt-priority executor keeps the
//! interrupt load realistic.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::PioWs2812Program;
use embassy_rp::uart::UartTx;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pixelwatch_core::config::DisplayConfig;
use pixelwatch_core::diag::DiagnosticGate;
use pixelwatch_core::timing::{FrameRateCalculator, FrameRateError, PacingGate};
use pixelwatch_core::traits::{SerialConfig, SerialSink};
use pixelwatch_hal_rp2040::{to_uart_config, Strand, UartSerial};

use crate::display::DisplayRenderer;

mod channels;
mod config;
mod demo;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Core 1 runs only the render worker
static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

// Interrupt-priority executor for the pulse generator
static EXECUTOR_PULSE: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_PULSE.on_interrupt()
}

/// Main entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    info!("pixelwatch firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::supervisor_config();
    unwrap!(config.validate());
    let pacing = unwrap!(setup_pacing(&config.display));
    channels::RENDER
        .state()
        .set_brightness(config.display.brightness);
    info!("Brightness {}", config.display.brightness);

    // Diagnostic serial port: UART0 TX on GPIO0
    let serial_config = SerialConfig::default();
    let tx = UartTx::new_blocking(p.UART0, p.PIN_0, to_uart_config(&serial_config));
    let sink = SerialSink::begin(UartSerial::new(tx), serial_config);
    let gate = channels::GATE.init(DiagnosticGate::new(sink, config.diagnostics));
    info!(
        "Diagnostic gate ready ({} baud, enabled: {})",
        serial_config.baudrate,
        gate.is_enabled()
    );

    // Display: PIO0 state machines 0-3 on GPIO 2-5, DMA channels 0-3.
    // `common` lives in this frame, which never returns.
    let Pio {
        mut common,
        sm0,
        sm1,
        sm2,
        sm3,
        ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let renderer = DisplayRenderer::new(
        Strand::new(&mut common, sm0, p.DMA_CH0, p.PIN_2, &program),
        Strand::new(&mut common, sm1, p.DMA_CH1, p.PIN_3, &program),
        Strand::new(&mut common, sm2, p.DMA_CH2, p.PIN_4, &program),
        Strand::new(&mut common, sm3, p.DMA_CH3, p.PIN_5, &program),
    );
    info!("WS2812 strands initialized: {} channels", config::CHANNEL_COUNT);

    // Pulse generator output on GPIO15
    let pulse_pin = Output::new(p.PIN_15, Level::Low);
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let pulse_spawner = EXECUTOR_PULSE.start(interrupt::SWI_IRQ_1);
    pulse_spawner.spawn(unwrap!(tasks::pulse_task(pulse_pin)));

    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| {
                spawner.spawn(unwrap!(tasks::render_worker_task(renderer)));
            });
        },
    );

    info!("All tasks spawned, firmware running");

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| {
        spawner.spawn(unwrap!(tasks::render_loop_task(gate, pacing, config)));
    })
}

/// Derive wake pacing from the channel sizes
fn setup_pacing(display: &DisplayConfig) -> Result<PacingGate, FrameRateError> {
    let mut calculator = FrameRateCalculator::new();
    for &pixels in display.channels.iter() {
        let channel = calculator.register(pixels)?;
        info!(
            "Channel: {} pixels, max {} Hz",
            channel.pixels(),
            channel.max_frequency_hz()
        );
    }
    let pacing = calculator.finish()?;
    info!(
        "Lowest frame rate {} Hz: refresh cap {} Hz, wake interval {} ms",
        pacing.lowest_frequency_hz(),
        pacing.max_refresh_hz(),
        pacing.interval_ms()
    );

    if display.stutter_reduction {
        Ok(PacingGate::from_pacing(&pacing))
    } else {
        info!("Stutter reduction off, waking the worker every loop");
        Ok(PacingGate::unpaced())
    }
}
