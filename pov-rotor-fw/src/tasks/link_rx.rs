//! Link UART receive task
//!
//! Reads lines from the static unit, runs them through the rotor engine and
//! queues the replies. A read that times out counts as a missed interval for
//! the link monitor.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embassy_time::{with_timeout, Duration};

use pov_core::config::RotorConfig;
use pov_core::engine::{Event, RotorEngine};
use pov_core::monitor::{LinkMonitor, LinkTransition};
use pov_hal_rp2040::{LineReader, LinkError};

use crate::channels::{FRAME, REPLIES};

#[embassy_executor::task]
pub async fn link_rx_task(rx: BufferedUartRx, config: &'static RotorConfig) {
    info!("Link RX task started");

    let mut reader = LineReader::new(rx);
    let mut engine = RotorEngine::new(&config.address, &FRAME);
    let mut monitor = LinkMonitor::new(config.link_timeout_ms);
    let timeout = Duration::from_millis(config.link_timeout_ms as u64);

    loop {
        let line = match with_timeout(timeout, reader.read_line()).await {
            Ok(Ok(line)) => line,
            Ok(Err(LinkError::Line(e))) => {
                warn!("Line dropped: {:?}", e);
                continue;
            }
            Ok(Err(e)) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
            Err(_) => {
                if let Some(LinkTransition::Lost) = monitor.update_time(config.link_timeout_ms) {
                    warn!("Link lost: no message from {}", config.peer_address.as_str());
                }
                continue;
            }
        };

        if let Some(LinkTransition::Restored) = monitor.message_received() {
            info!("Link restored");
        }

        trace!("RX: {}", line);

        let handled = match engine.handle(line) {
            Ok(handled) => handled,
            Err(e) => {
                warn!("Message dropped: {:?}", e);
                continue;
            }
        };

        log_event(handled.event);

        if let Some(reply) = handled.reply {
            REPLIES.send(reply).await;
        }
    }
}

fn log_event(event: Event) {
    match event {
        Event::FrameUpdated { slots } => debug!("Frame updated: {} slots", slots),
        Event::Locked { token } => info!("Locked by token {}", token),
        Event::Unlocked { token } => info!("Unlocked with token {}", token),
        Event::UnlockRejected { token } => warn!("Unlock rejected: token {}", token),
        Event::Test => trace!("Keepalive"),
        Event::Malformed(e) => warn!("Malformed message: {:?}", e),
        Event::UnknownCommand => warn!("Unknown command"),
        Event::NotAccepted => warn!("Command not accepted by the rotor"),
        Event::Response { request, status } => {
            debug!("Response to {:?}: {:?}", request, status)
        }
        Event::UnexpectedResponse { status } => debug!("Ignored response: {:?}", status),
        Event::NotForUs => warn!("Message addressed to another unit"),
    }
}
