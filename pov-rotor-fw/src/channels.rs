//! Shared state between rotor tasks
//!
//! The frame and the slot index are plain atomics so the display task never
//! waits on the protocol task. Replies go through a channel to the link
//! transmitter.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicBool, Ordering};

use pov_core::display::{RotationSync, SlotIndex};
use pov_core::engine::Reply;
use pov_core::frame::FrameBuffer;

/// Replies queued for the link transmitter
const REPLY_QUEUE_SIZE: usize = 4;

/// Pattern being painted, written by the link task
pub static FRAME: FrameBuffer = FrameBuffer::new();

/// Slot currently shown
pub static SLOT_INDEX: SlotIndex = SlotIndex::new();

/// Phase reference from the rotation sensor
pub static ROTATION: RotationSync = RotationSync::new();

/// Reply lines for the static unit
pub static REPLIES: Channel<CriticalSectionRawMutex, Reply, REPLY_QUEUE_SIZE> = Channel::new();

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Ask every output path to turn off
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Release);
}

/// Whether a shutdown was requested
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Acquire)
}
