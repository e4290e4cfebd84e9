//! Configuration type definitions
//!
//! Each firmware embeds a small TOML file that is parsed into one of these
//! at boot. With the `serde` feature the same types are deserialized by the
//! build scripts to validate the file before it is embedded.

use heapless::String;

use crate::display::{DEFAULT_CALIBRATION_SLOT, DEFAULT_SLOT_INTERVAL_US};
use crate::face::{ClockTime, DEFAULT_FACE_REFRESH_MS};
use crate::monitor::DEFAULT_LINK_TIMEOUT_MS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum address length
pub const MAX_ADDRESS_LEN: usize = 24;

/// Unit address as written in the sender and receiver fields
pub type Address = String<MAX_ADDRESS_LEN>;

/// `HH:MM` as written in the config file
pub type TimeText = String<5>;

/// Default link baud rate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

pub(crate) fn address(text: &str) -> Address {
    let mut address = Address::new();
    let _ = address.push_str(text);
    address
}

fn time_text(text: &str) -> TimeText {
    let mut time = TimeText::new();
    let _ = time.push_str(text);
    time
}

/// Rotor unit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RotorConfig {
    /// Our own address
    pub address: Address,
    /// Address of the static unit
    pub peer_address: Address,
    /// Slot shown when the rotation sensor fires
    pub calibration_slot: u8,
    /// Time each slot stays lit (µs)
    pub slot_interval_us: u32,
    /// Link check interval (ms)
    pub link_timeout_ms: u32,
    /// UART baud rate
    pub baudrate: u32,
}

impl Default for RotorConfig {
    fn default() -> Self {
        Self {
            address: address("192.168.1.20"),
            peer_address: address("192.168.1.10"),
            calibration_slot: DEFAULT_CALIBRATION_SLOT,
            slot_interval_us: DEFAULT_SLOT_INTERVAL_US,
            link_timeout_ms: DEFAULT_LINK_TIMEOUT_MS,
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}

/// Static unit configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct StaticConfig {
    /// Our own address, also the source of the lock token
    pub address: Address,
    /// Address of the rotor unit
    pub peer_address: Address,
    /// Rotor speed setpoint
    pub target_rpm: u32,
    /// Encoder pulses per revolution ×10
    pub pulses_per_rev_x10: u32,
    /// Speed control period (ms)
    pub sample_period_ms: u32,
    /// Proportional gain ×100
    pub kp_x100: i32,
    /// Full scale PWM duty
    pub max_duty: u16,
    /// Zero-pulse periods before a stall is reported
    pub stall_periods: u8,
    /// Interval between minute checks (ms)
    pub face_refresh_ms: u32,
    /// Time of day at power up, `HH:MM`
    pub start_time: TimeText,
    /// Interval between keepalives when the link is idle (ms)
    pub keepalive_ms: u32,
    /// Sound the hourly chime
    pub chime: bool,
    /// UART baud rate
    pub baudrate: u32,
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            address: address("192.168.1.10"),
            peer_address: address("192.168.1.20"),
            target_rpm: 1500,
            pulses_per_rev_x10: 528,
            sample_period_ms: 250,
            kp_x100: 100,
            max_duty: 1024,
            stall_periods: 8,
            face_refresh_ms: DEFAULT_FACE_REFRESH_MS,
            start_time: time_text("12:00"),
            keepalive_ms: 1000,
            chime: true,
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}

impl StaticConfig {
    /// Parsed start time, noon if the text is invalid
    pub fn start_time(&self) -> ClockTime {
        ClockTime::parse(&self.start_time).unwrap_or(ClockTime {
            hour: 12,
            minute: 0,
        })
    }
}
