//! Slot index and revolution sync

use portable_atomic::{AtomicU32, AtomicU8, Ordering};

use crate::frame::SLOT_COUNT;

/// Slot shown when the rotation sensor fires
pub const DEFAULT_CALIBRATION_SLOT: u8 = 64;

/// Active display slot, always in `0..SLOT_COUNT`
pub struct SlotIndex {
    slot: AtomicU8,
}

impl Default for SlotIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotIndex {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(0),
        }
    }

    /// Current slot
    pub fn get(&self) -> u8 {
        self.slot.load(Ordering::Relaxed)
    }

    /// Move to the next slot, returning the one that was current
    ///
    /// Done as a single read-modify-write so a concurrent [`reset_to`]
    /// is never overwritten by a stale increment.
    ///
    /// [`reset_to`]: Self::reset_to
    pub fn advance(&self) -> u8 {
        match self
            .slot
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |slot| {
                Some(next_slot(slot))
            }) {
            Ok(previous) | Err(previous) => previous,
        }
    }

    /// Jump to a slot
    pub fn reset_to(&self, slot: u8) {
        self.slot.store(slot % SLOT_COUNT as u8, Ordering::Relaxed);
    }
}

fn next_slot(slot: u8) -> u8 {
    (slot.wrapping_add(1)) % SLOT_COUNT as u8
}

/// Revolution edge handling
///
/// Holds the calibration slot and counts edges so the firmware can report
/// the disc speed.
pub struct RotationSync {
    calibration: AtomicU8,
    edges: AtomicU32,
}

impl Default for RotationSync {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationSync {
    pub const fn new() -> Self {
        Self {
            calibration: AtomicU8::new(DEFAULT_CALIBRATION_SLOT),
            edges: AtomicU32::new(0),
        }
    }

    /// Set the slot the display snaps to on each revolution
    pub fn set_calibration(&self, slot: u8) {
        self.calibration
            .store(slot % SLOT_COUNT as u8, Ordering::Relaxed);
    }

    /// Configured calibration slot
    pub fn calibration(&self) -> u8 {
        self.calibration.load(Ordering::Relaxed)
    }

    /// Called on every rising edge of the rotation sensor
    pub fn on_revolution_edge(&self, index: &SlotIndex) {
        index.reset_to(self.calibration());
        self.edges.fetch_add(1, Ordering::Relaxed);
    }

    /// Revolutions seen since the last call
    pub fn take_revolutions(&self) -> u32 {
        self.edges.swap(0, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps() {
        let index = SlotIndex::new();
        index.reset_to(118);
        assert_eq!(index.advance(), 118);
        assert_eq!(index.advance(), 119);
        assert_eq!(index.get(), 0);
    }

    #[test]
    fn test_reset_out_of_range() {
        let index = SlotIndex::new();
        index.reset_to(200);
        assert!(index.get() < SLOT_COUNT as u8);
    }

    #[test]
    fn test_edge_sets_calibration() {
        let index = SlotIndex::new();
        let sync = RotationSync::new();
        index.reset_to(17);

        sync.on_revolution_edge(&index);
        assert_eq!(index.get(), DEFAULT_CALIBRATION_SLOT);

        sync.set_calibration(3);
        sync.on_revolution_edge(&index);
        assert_eq!(index.get(), 3);
        assert_eq!(sync.take_revolutions(), 2);
        assert_eq!(sync.take_revolutions(), 0);
    }
}
