//! Link UART transmit task
//!
//! Sends queued lines to the rotor. When nothing has been sent for
//! `keepalive_ms` a `test` message goes out instead, so the rotor's link
//! monitor sees traffic on an idle link.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{with_timeout, Duration};

use pov_core::config::StaticConfig;
use pov_core::engine::outgoing_request;
use pov_protocol::{Line, Message};
use pov_hal_rp2040::write_line;

use crate::channels::{OUTBOX, REQUESTS_SENT};

#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx, config: &'static StaticConfig) {
    info!("Link TX task started");

    let keepalive = Duration::from_millis(config.keepalive_ms as u64);

    loop {
        let line: Line = match with_timeout(keepalive, OUTBOX.receive()).await {
            Ok(line) => line,
            Err(_) => match Message::test(&config.address, &config.peer_address).encode() {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to encode keepalive: {:?}", e);
                    continue;
                }
            },
        };

        trace!("TX: {}", line.as_str());

        if let Err(e) = write_line(&mut tx, &line).await {
            warn!("UART write error: {:?}", e);
            continue;
        }

        if let Some(request) = outgoing_request(&line) {
            if REQUESTS_SENT.try_send(request).is_err() {
                warn!("Request log full, {:?} not tracked", request);
            }
        }
    }
}
