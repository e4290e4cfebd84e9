//! Encoder edge task
//!
//! Counts falling edges of the motor encoder. The speed control task takes
//! and clears the count once per period.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::ENCODER;

#[embassy_executor::task]
pub async fn encoder_task(mut encoder: Input<'static>) {
    info!("Encoder task started");

    loop {
        encoder.wait_for_falling_edge().await;
        ENCODER.on_edge();
    }
}
