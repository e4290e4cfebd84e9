//! Clock face task
//!
//! Keeps time of day from the configured start time and the uptime, and
//! sends a fresh face to the rotor whenever the minute changes.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use pov_core::config::StaticConfig;
use pov_core::face::{face_message, ChimeSchedule, FaceUpdater, WallClock};

use crate::channels::{shutdown_requested, OUTBOX};
use crate::tasks::chime::SignalChime;

#[embassy_executor::task]
pub async fn clock_face_task(config: &'static StaticConfig) {
    info!("Clock face task started");

    let clock = WallClock::new(config.start_time());
    let mut updater = FaceUpdater::new();
    let mut schedule = ChimeSchedule::starting_at(clock.time_at(Instant::now().as_secs()));
    let mut chime = SignalChime;
    let mut ticker = Ticker::every(Duration::from_millis(config.face_refresh_ms as u64));

    loop {
        if shutdown_requested() {
            info!("Clock face stopped");
            return;
        }

        let now = clock.time_at(Instant::now().as_secs());

        if let Some(face) = updater.poll(now) {
            match face_message(&face, &config.address, &config.peer_address) {
                Ok(line) => {
                    debug!("Sending face for {}", now);
                    OUTBOX.send(line).await;
                }
                Err(e) => {
                    error!("Failed to encode face: {:?}", e);
                    updater.invalidate();
                }
            }
        }

        if config.chime {
            if let Some(strikes) = schedule.poll(now, &mut chime) {
                info!("Hourly chime: {} strikes", strikes);
            }
        }

        ticker.next().await;
    }
}
