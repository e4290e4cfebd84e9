//! Inter-task communication for the static unit
//!
//! Every outgoing line goes through `OUTBOX`, so the link transmitter is the
//! only writer on the UART and the lock request queued at boot is sent
//! before any face update.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use pov_core::engine::{RequestKind, MAX_PENDING};
use pov_drivers::motor::{DutyCell, EncoderCounter};
use pov_protocol::Line;

/// Lines waiting for the link transmitter
const OUTBOX_SIZE: usize = 4;

/// Outgoing lines, in send order
pub static OUTBOX: Channel<CriticalSectionRawMutex, Line, OUTBOX_SIZE> = Channel::new();

/// Requests written to the link, for response correlation
pub static REQUESTS_SENT: Channel<CriticalSectionRawMutex, RequestKind, MAX_PENDING> =
    Channel::new();

/// Encoder pulses since the last control period
pub static ENCODER: EncoderCounter = EncoderCounter::new();

/// Duty last applied to the motor
pub static DUTY: DutyCell = DutyCell::new();

/// Pulses counted in the last control period
pub static LAST_PULSES: AtomicU32 = AtomicU32::new(0);

/// Motor stall signal, true when a stall starts, false when it clears
pub static MOTOR_STALL: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Whether the rotor last answered our lock with LOCKED
pub static LOCK_HELD: AtomicBool = AtomicBool::new(false);

/// Number of strikes for the chime task
pub static CHIME: Signal<CriticalSectionRawMutex, u8> = Signal::new();

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Ask every output path to turn off
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::Release);
}

/// Whether a shutdown was requested
pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::Acquire)
}
