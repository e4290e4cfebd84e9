//! Display scan task
//!
//! Paints one slot per tick. The slot index only moves forward here; the
//! rotation task snaps it back to the calibration slot once per turn.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use pov_core::display::DisplayScanner;
use pov_core::frame::LINE_COUNT;
use pov_core::traits::OutputLines;
use pov_drivers::lines::LineBank;

use crate::channels::{shutdown_requested, FRAME, SLOT_INDEX};

/// Display task - strobes the LED column
#[embassy_executor::task]
pub async fn display_task(mut lines: LineBank<Output<'static>, LINE_COUNT>, interval_us: u32) {
    info!("Display task started ({} us per slot)", interval_us);

    let scanner = DisplayScanner::new(&FRAME, &SLOT_INDEX);
    let mut ticker = Ticker::every(Duration::from_micros(interval_us.max(1) as u64));

    loop {
        if shutdown_requested() {
            lines.all_off();
            info!("Display stopped, all lines off");
            return;
        }

        scanner.step(&mut lines);
        ticker.next().await;
    }
}
