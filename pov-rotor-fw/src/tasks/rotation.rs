//! Rotation sensor task
//!
//! The hall sensor pulses once per revolution. Each rising edge resets the
//! slot index to the calibration slot.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::{ROTATION, SLOT_INDEX};

#[embassy_executor::task]
pub async fn rotation_task(mut sensor: Input<'static>) {
    info!("Rotation task started");

    loop {
        sensor.wait_for_rising_edge().await;
        ROTATION.on_revolution_edge(&SLOT_INDEX);
    }
}
