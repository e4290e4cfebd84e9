//! POV clock - rotor firmware
//!
//! Runs on the RP2040 that spins with the disk. Paints the 120-slot frame on
//! 24 LED lines, re-phased once per revolution by the hall sensor, and takes
//! frame updates from the static unit over UART0.
//!
//! Pins:
//! - GPIO0/GPIO1: UART0 TX/RX to the static unit
//! - GPIO2..GPIO25: LED lines 0..23
//! - GPIO26: rotation sensor (rising edge once per turn)
//! - GPIO27: stop switch (active low)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pov_drivers::lines::LineBank;

mod channels;
mod config;
mod tasks;

use crate::channels::ROTATION;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static buffers for the link UART
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();

/// Interval between status reports
const STATUS_INTERVAL_SECS: u64 = 5;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("POV rotor firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    ROTATION.set_calibration(config.calibration_slot);

    // Setup UART for the link to the static unit
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 2048]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.baudrate);

    // LED lines, all dark until the first display message
    let lines = LineBank::new([
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_12, Level::Low),
        Output::new(p.PIN_13, Level::Low),
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_16, Level::Low),
        Output::new(p.PIN_17, Level::Low),
        Output::new(p.PIN_18, Level::Low),
        Output::new(p.PIN_19, Level::Low),
        Output::new(p.PIN_20, Level::Low),
        Output::new(p.PIN_21, Level::Low),
        Output::new(p.PIN_22, Level::Low),
        Output::new(p.PIN_23, Level::Low),
        Output::new(p.PIN_24, Level::Low),
        Output::new(p.PIN_25, Level::Low),
    ]);

    let sensor = Input::new(p.PIN_26, Pull::Down);
    let stop = Input::new(p.PIN_27, Pull::Up);

    info!("GPIO initialized");

    // Spawn tasks
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx, config)).unwrap();
    spawner.spawn(tasks::rotation_task(sensor)).unwrap();
    spawner
        .spawn(tasks::display_task(lines, config.slot_interval_us))
        .unwrap();
    spawner.spawn(tasks::shutdown_task(stop)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(STATUS_INTERVAL_SECS).await;
        let revolutions = ROTATION.take_revolutions();
        let rpm = revolutions as u64 * 60 / STATUS_INTERVAL_SECS;
        debug!("Status: {} revolutions, ~{} rpm", revolutions, rpm);
    }
}
