//! POV clock - static unit firmware
//!
//! Runs on the RP2040 in the base. Spins the rotor at a regulated speed,
//! keeps the time of day and sends the clock face to the rotor over UART0.
//! The rotor is locked before any face update and unlocked on shutdown.
//!
//! Pins:
//! - GPIO0/GPIO1: UART0 TX/RX to the rotor
//! - GPIO4: motor driver PWM (slice 2, channel A)
//! - GPIO5: motor driver disable (active high)
//! - GPIO6: motor encoder (falling edge per pulse)
//! - GPIO7: motor direction (high for clockwise)
//! - GPIO15: stop switch (active low)
//! - GPIO27: speaker amplifier enable

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Timer;
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pov_core::lock::{LockCoordinator, LockToken};
use pov_hal_rp2040::pwm::DEFAULT_PWM_DIVIDER;
use pov_hal_rp2040::MotorPwm;

mod channels;
mod config;
mod tasks;

use crate::channels::{DUTY, LAST_PULSES, LOCK_HELD, MOTOR_STALL, OUTBOX};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static buffers for the link UART
static TX_BUF: StaticCell<[u8; 2048]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Interval between status reports
const STATUS_INTERVAL_SECS: u64 = 5;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("POV static firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    let speed_config = config::speed_control(config);

    // Setup UART for the link to the rotor
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 2048]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config.baudrate);

    // Motor driver: PWM input, disabled until the control task starts
    let pwm = Pwm::new_output_a(p.PWM_SLICE2, p.PIN_4, PwmConfig::default());
    let pwm = MotorPwm::new(pwm, config.max_duty, DEFAULT_PWM_DIVIDER);
    let disable = Output::new(p.PIN_5, Level::High);
    let dir = Output::new(p.PIN_7, Level::High);
    let encoder = Input::new(p.PIN_6, Pull::Up);

    let stop = Input::new(p.PIN_15, Pull::Up);
    let speaker = Output::new(p.PIN_27, Level::Low);

    info!("GPIO and PWM initialized");

    // The rotor must be locked before any display traffic
    let lock = match LockCoordinator::new(&config.address, &config.peer_address) {
        Ok(lock) => lock,
        Err(e) => {
            error!("Cannot derive lock token from address: {:?}", e);
            error!("Using token 0");
            LockCoordinator::with_token(&config.address, &config.peer_address, LockToken::default())
        }
    };
    info!("Lock token {}", lock.token().value());

    match lock.lock_line() {
        Ok(line) => {
            if OUTBOX.try_send(line).is_err() {
                error!("Failed to queue lock request");
            }
        }
        Err(e) => error!("Failed to encode lock request: {:?}", e),
    }

    // Spawn tasks
    spawner.spawn(tasks::link_tx_task(tx, config)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx, config)).unwrap();
    spawner.spawn(tasks::encoder_task(encoder)).unwrap();
    spawner
        .spawn(tasks::speed_control_task(
            pwm,
            disable,
            dir,
            speed_config,
            config.stall_periods,
        ))
        .unwrap();
    spawner.spawn(tasks::clock_face_task(config)).unwrap();
    spawner.spawn(tasks::chime_task(speaker)).unwrap();
    spawner.spawn(tasks::shutdown_task(stop, lock)).unwrap();

    info!("All tasks spawned, firmware running");

    let mut stalled = false;

    loop {
        match select(Timer::after_secs(STATUS_INTERVAL_SECS), MOTOR_STALL.wait()).await {
            Either::First(()) => {
                let pulses = LAST_PULSES.load(Ordering::Relaxed);
                info!(
                    "Status: {} rpm, duty {}, stalled={}, locked={}",
                    speed_config.measured_rpm(pulses),
                    DUTY.load(),
                    stalled,
                    LOCK_HELD.load(Ordering::Relaxed)
                );
            }
            Either::Second(now_stalled) => {
                if now_stalled && !stalled {
                    error!("Rotor not turning, check the belt and the encoder");
                }
                stalled = now_stalled;
            }
        }
    }
}
