//! Hourly chime task
//!
//! Plays the strikes requested through `CHIME` by pulsing the speaker
//! amplifier enable line.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use pov_core::traits::Chime;

use crate::channels::CHIME;

/// Speaker on time per strike
const STRIKE_ON_MS: u64 = 300;

/// Silence between strikes
const STRIKE_GAP_MS: u64 = 700;

/// Chime that hands the strikes to [`chime_task`]
pub struct SignalChime;

impl Chime for SignalChime {
    fn strike(&mut self, strikes: u8) {
        CHIME.signal(strikes);
    }
}

#[embassy_executor::task]
pub async fn chime_task(mut speaker: Output<'static>) {
    info!("Chime task started");

    loop {
        let strikes = CHIME.wait().await;
        debug!("Chiming {} times", strikes);

        for _ in 0..strikes {
            speaker.set_high();
            Timer::after_millis(STRIKE_ON_MS).await;
            speaker.set_low();
            Timer::after_millis(STRIKE_GAP_MS).await;
        }
    }
}
