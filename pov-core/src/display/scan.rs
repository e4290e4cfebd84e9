//! Display loop step

use crate::display::phase::SlotIndex;
use crate::frame::FrameBuffer;
use crate::traits::OutputLines;

/// Time each slot stays lit; 250 µs is about 1500 rpm, 200 µs about 1700 rpm
pub const DEFAULT_SLOT_INTERVAL_US: u32 = 250;

/// Shows the frame one slot at a time
pub struct DisplayScanner<'a> {
    frame: &'a FrameBuffer,
    index: &'a SlotIndex,
}

impl<'a> DisplayScanner<'a> {
    pub fn new(frame: &'a FrameBuffer, index: &'a SlotIndex) -> Self {
        Self { frame, index }
    }

    /// Light the current slot and move on to the next one
    ///
    /// Returns the slot that was shown.
    pub fn step<L: OutputLines>(&self, lines: &mut L) -> u8 {
        let slot = self.index.advance();
        lines.write_mask(self.frame.load(slot));
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pov_protocol::SlotUpdate;

    #[derive(Default)]
    struct Recorder {
        last: u32,
        writes: usize,
    }

    impl OutputLines for Recorder {
        fn write_mask(&mut self, mask: u32) {
            self.last = mask;
            self.writes += 1;
        }
    }

    #[test]
    fn test_step_shows_current_slot() {
        let frame = FrameBuffer::new();
        let index = SlotIndex::new();
        frame.store(SlotUpdate {
            index: 5,
            mask: 0x00_1234,
        });
        index.reset_to(5);

        let scanner = DisplayScanner::new(&frame, &index);
        let mut lines = Recorder::default();

        assert_eq!(scanner.step(&mut lines), 5);
        assert_eq!(lines.last, 0x1234);
        assert_eq!(index.get(), 6);

        scanner.step(&mut lines);
        assert_eq!(lines.last, 0);
        assert_eq!(lines.writes, 2);
    }

    #[test]
    fn test_steps_cycle_the_revolution() {
        let frame = FrameBuffer::new();
        let index = SlotIndex::new();
        let scanner = DisplayScanner::new(&frame, &index);
        let mut lines = Recorder::default();

        index.reset_to(64);
        for _ in 0..250 {
            scanner.step(&mut lines);
        }
        assert_eq!(index.get(), ((64 + 250) % 120) as u8);
    }
}
