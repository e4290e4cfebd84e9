//! Stop switch task

use defmt::*;
use embassy_rp::gpio::Input;

use pov_core::config::StaticConfig;
use pov_core::lock::LockCoordinator;

use crate::channels::{request_shutdown, OUTBOX};

/// Wait for the stop switch (active low), release the rotor and stop
#[embassy_executor::task]
pub async fn shutdown_task(mut stop: Input<'static>, lock: LockCoordinator<'static>) {
    info!("Shutdown task started");

    stop.wait_for_low().await;
    warn!("Stop switch pressed, shutting down");

    // Stop face updates first so the unlock is the last request queued
    request_shutdown();

    match lock.unlock_line() {
        Ok(line) => OUTBOX.send(line).await,
        Err(e) => error!("Failed to encode unlock: {:?}", e),
    }
}
