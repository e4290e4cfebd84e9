//! Link UART transmit task
//!
//! Sends the replies produced by the receive task, in order.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;

use pov_hal_rp2040::write_line;

use crate::channels::REPLIES;

#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let reply = REPLIES.receive().await;
        trace!("TX: {}", reply.as_str());

        if let Err(e) = write_line(&mut tx, &reply).await {
            warn!("UART write error: {:?}", e);
        }
    }
}
