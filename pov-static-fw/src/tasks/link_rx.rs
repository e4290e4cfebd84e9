//! Link UART receive task
//!
//! Reads lines from the rotor and runs them through the controller engine,
//! which matches responses to the requests the transmit task recorded.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use portable_atomic::Ordering;

use pov_core::config::StaticConfig;
use pov_core::engine::{ControllerEngine, Event, RequestKind, ResponseHandler};
use pov_hal_rp2040::{LineReader, LinkError};
use pov_protocol::{CommandWord, Status};

use crate::channels::{LOCK_HELD, OUTBOX, REQUESTS_SENT};

/// Logs responses and tracks the rotor lock
struct LinkStatusHandler;

impl ResponseHandler for LinkStatusHandler {
    fn on_response(&mut self, request: RequestKind, status: Status) {
        match (request, status) {
            (RequestKind::Lock, Status::Locked) => {
                info!("Rotor locked");
                LOCK_HELD.store(true, Ordering::Relaxed);
            }
            (RequestKind::Unlock, Status::Unlocked) => {
                info!("Rotor unlocked");
                LOCK_HELD.store(false, Ordering::Relaxed);
            }
            (RequestKind::Unlock, Status::StillLocked) => {
                warn!("Rotor refused unlock: token mismatch");
            }
            (request, status) if status.is_rejection() => {
                warn!("Rotor rejected {:?}: {:?}", request, status);
            }
            (request, status) => trace!("{:?} answered {:?}", request, status),
        }
    }

    fn on_unexpected(&mut self, request: CommandWord<'_>, status: Status) {
        debug!(
            "Uncorrelated response to '{}': {:?}",
            request.as_str(),
            status
        );
    }
}

#[embassy_executor::task]
pub async fn link_rx_task(rx: BufferedUartRx, config: &'static StaticConfig) {
    info!("Link RX task started");

    let mut reader = LineReader::new(rx);
    let mut engine = ControllerEngine::new(&config.address, LinkStatusHandler);

    loop {
        let line = match reader.read_line().await {
            Ok(line) => line,
            Err(LinkError::Line(e)) => {
                warn!("Line dropped: {:?}", e);
                continue;
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        trace!("RX: {}", line);

        while let Ok(request) = REQUESTS_SENT.try_receive() {
            engine.request_sent(request);
        }

        let handled = match engine.handle(line) {
            Ok(handled) => handled,
            Err(e) => {
                warn!("Message dropped: {:?}", e);
                continue;
            }
        };

        match handled.event {
            Event::Malformed(e) => warn!("Malformed message: {:?}", e),
            Event::UnknownCommand => warn!("Unknown command from rotor"),
            Event::NotAccepted => warn!("Rotor sent a command only the static unit may send"),
            Event::NotForUs => warn!("Message addressed to another unit"),
            _ => {}
        }

        if let Some(reply) = handled.reply {
            OUTBOX.send(reply).await;
        }
    }
}
