//! Stop switch task

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::request_shutdown;

/// Wait for the stop switch (active low), then stop all outputs
#[embassy_executor::task]
pub async fn shutdown_task(mut stop: Input<'static>) {
    info!("Shutdown task started");

    stop.wait_for_low().await;
    warn!("Stop switch pressed, shutting down");
    request_shutdown();
}
