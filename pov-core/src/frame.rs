//! Frame storage
//!
//! A frame is one mask per angular slot. [`Frame`] is a plain value used when
//! composing faces; [`FrameBuffer`] is the shared copy the rotor displays,
//! written by the link task and read by the display loop without locking.

use portable_atomic::{AtomicU32, Ordering};
use pov_protocol::SlotUpdate;

pub use pov_protocol::{MAX_MASK, SLOT_COUNT};

/// Number of LED output lines driven from a slot mask
pub const LINE_COUNT: usize = 24;

/// Reduce any slot arithmetic result into `0..SLOT_COUNT`
pub const fn wrap_slot(index: i32) -> u8 {
    index.rem_euclid(SLOT_COUNT as i32) as u8
}

/// An owned frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    slots: [u32; SLOT_COUNT],
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl Frame {
    /// A frame with every line off
    pub const fn empty() -> Self {
        Self {
            slots: [0; SLOT_COUNT],
        }
    }

    /// Build a frame from raw slot masks
    pub const fn from_slots(slots: [u32; SLOT_COUNT]) -> Self {
        Self { slots }
    }

    /// Mask stored in a slot
    pub fn get(&self, index: u8) -> u32 {
        self.slots[index as usize % SLOT_COUNT]
    }

    /// Replace the mask of a slot
    pub fn set(&mut self, index: u8, mask: u32) {
        self.slots[index as usize % SLOT_COUNT] = mask & MAX_MASK;
    }

    /// OR additional lines into a slot
    pub fn overlay(&mut self, index: u8, mask: u32) {
        self.slots[index as usize % SLOT_COUNT] |= mask & MAX_MASK;
    }

    /// Raw slot masks
    pub fn slots(&self) -> &[u32; SLOT_COUNT] {
        &self.slots
    }

    /// Slots with at least one line on, in ascending index order
    pub fn lit_slots(&self) -> impl Iterator<Item = SlotUpdate> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(_, &mask)| mask != 0)
            .map(|(index, &mask)| SlotUpdate {
                index: index as u8,
                mask,
            })
    }
}

/// Frame shared between tasks
///
/// Every slot is its own atomic word, so a reader always sees either the old
/// or the new mask of a slot, never a mix of both.
pub struct FrameBuffer {
    slots: [AtomicU32; SLOT_COUNT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// Create a blank frame buffer
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU32::new(0) }; SLOT_COUNT],
        }
    }

    /// Load the mask of a slot
    pub fn load(&self, index: u8) -> u32 {
        self.slots[index as usize % SLOT_COUNT].load(Ordering::Relaxed)
    }

    /// Store a single slot update
    pub fn store(&self, update: SlotUpdate) {
        self.slots[update.index as usize % SLOT_COUNT].store(update.mask & MAX_MASK, Ordering::Relaxed);
    }

    /// Apply updates in order, returning how many were applied
    ///
    /// When a slot appears more than once the last update wins.
    pub fn apply<I>(&self, updates: I) -> usize
    where
        I: IntoIterator<Item = SlotUpdate>,
    {
        let mut applied = 0;
        for update in updates {
            self.store(update);
            applied += 1;
        }
        applied
    }

    /// Turn every slot off
    pub fn clear(&self) {
        for slot in &self.slots {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Copy the current contents
    pub fn snapshot(&self) -> Frame {
        let mut frame = Frame::empty();
        for (index, slot) in self.slots.iter().enumerate() {
            frame.slots[index] = slot.load(Ordering::Relaxed);
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_slot() {
        assert_eq!(wrap_slot(0), 0);
        assert_eq!(wrap_slot(120), 0);
        assert_eq!(wrap_slot(-1), 119);
        assert_eq!(wrap_slot(241), 1);
    }

    #[test]
    fn test_frame_overlay_and_mask_limit() {
        let mut frame = Frame::empty();
        frame.set(3, 0x800000);
        frame.overlay(3, 0x0F);
        assert_eq!(frame.get(3), 0x80000F);

        frame.set(4, 0xFFFF_FFFF);
        assert_eq!(frame.get(4), MAX_MASK);
    }

    #[test]
    fn test_lit_slots_ascending() {
        let mut frame = Frame::empty();
        frame.set(90, 1);
        frame.set(2, 2);
        let lit: heapless::Vec<SlotUpdate, 4> = frame.lit_slots().collect();
        assert_eq!(lit.len(), 2);
        assert_eq!(lit[0], SlotUpdate { index: 2, mask: 2 });
        assert_eq!(lit[1], SlotUpdate { index: 90, mask: 1 });
    }

    #[test]
    fn test_buffer_last_write_wins() {
        let buffer = FrameBuffer::new();
        let applied = buffer.apply([
            SlotUpdate { index: 7, mask: 0x1 },
            SlotUpdate { index: 7, mask: 0x2 },
        ]);
        assert_eq!(applied, 2);
        assert_eq!(buffer.load(7), 0x2);
    }

    #[test]
    fn test_buffer_clear_and_snapshot() {
        let buffer = FrameBuffer::new();
        buffer.store(SlotUpdate {
            index: 119,
            mask: 0xABCDEF,
        });
        assert_eq!(buffer.snapshot().get(119), 0xABCDEF);

        buffer.clear();
        assert_eq!(buffer.snapshot(), Frame::empty());
    }
}
