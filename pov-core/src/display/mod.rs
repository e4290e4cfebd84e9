//! Rotor display timing
//!
//! The rotor lights one slot at a time. The display loop advances a shared
//! [`SlotIndex`] after each slot, and the rotation sensor snaps it back to
//! the calibration slot once per revolution so drift never accumulates.

pub mod phase;
pub mod scan;

pub use phase::{RotationSync, SlotIndex, DEFAULT_CALIBRATION_SLOT};
pub use scan::{DisplayScanner, DEFAULT_SLOT_INTERVAL_US};
