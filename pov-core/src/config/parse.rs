//! Minimal TOML parser for the embedded unit configuration
//!
//! Handles only the subset the unit config files use. It does NOT support
//! the full TOML grammar.
//!
//! Supported features:
//! - Top level `key = value` pairs (string, integer, boolean)
//! - Comments (# ...), also after a value
//!
//! NOT supported:
//! - Section headers and tables
//! - Arrays, multi-line strings, datetime values

use heapless::String;

use super::types::{RotorConfig, StaticConfig};
use crate::face::ClockTime;
use crate::frame::SLOT_COUNT;

/// Parse error, carrying the 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither blank, a comment nor `key = value`
    Syntax { line: u16 },
    /// Key not known for this unit
    UnknownKey { line: u16 },
    /// Value has the wrong type or is out of range
    InvalidValue { line: u16 },
}

/// Iterate over the `(line, key, value)` entries of a config file
fn entries<'a>(
    input: &'a str,
) -> impl Iterator<Item = Result<(u16, &'a str, &'a str), ConfigError>> + 'a {
    input.lines().enumerate().filter_map(|(index, line)| {
        let number = (index + 1).min(u16::MAX as usize) as u16;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let entry = parse_key_value(line)
            .map(|(key, value)| (number, key, value))
            .ok_or(ConfigError::Syntax { line: number });
        Some(entry)
    })
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    // Remove inline comments that are not inside a string
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    Some((key, value))
}

/// Parse a quoted string value
fn parse_string<const N: usize>(value: &str) -> Option<String<N>> {
    let inner = value.strip_prefix('"')?.strip_suffix('"')?;
    if inner.contains('"') {
        return None;
    }
    let mut text = String::new();
    text.push_str(inner).ok()?;
    Some(text)
}

/// Parse an integer value, `_` separators allowed
fn parse_int<T: core::str::FromStr>(value: &str) -> Option<T> {
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).ok()?;
    }
    digits.parse().ok()
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a non-zero integer value
fn parse_positive(value: &str) -> Option<u32> {
    parse_int::<u32>(value).filter(|&v| v > 0)
}

/// Parse a unit address; must be usable as a message field
fn parse_address<const N: usize>(value: &str) -> Option<String<N>> {
    parse_string::<N>(value).filter(|a| !a.is_empty() && !a.contains([',', ' ']))
}

/// Parse the rotor unit configuration
///
/// Keys missing from the file keep their default value.
pub fn parse_rotor_config(input: &str) -> Result<RotorConfig, ConfigError> {
    let mut config = RotorConfig::default();

    for entry in entries(input) {
        let (line, key, value) = entry?;
        let invalid = ConfigError::InvalidValue { line };

        match key {
            "address" => config.address = parse_address(value).ok_or(invalid)?,
            "peer_address" => config.peer_address = parse_address(value).ok_or(invalid)?,
            "calibration_slot" => {
                config.calibration_slot = parse_int::<u8>(value)
                    .filter(|&slot| (slot as usize) < SLOT_COUNT)
                    .ok_or(invalid)?
            }
            "slot_interval_us" => config.slot_interval_us = parse_positive(value).ok_or(invalid)?,
            "link_timeout_ms" => config.link_timeout_ms = parse_positive(value).ok_or(invalid)?,
            "baudrate" => config.baudrate = parse_positive(value).ok_or(invalid)?,
            _ => return Err(ConfigError::UnknownKey { line }),
        }
    }

    Ok(config)
}

/// Parse the static unit configuration
///
/// Keys missing from the file keep their default value.
pub fn parse_static_config(input: &str) -> Result<StaticConfig, ConfigError> {
    let mut config = StaticConfig::default();

    for entry in entries(input) {
        let (line, key, value) = entry?;
        let invalid = ConfigError::InvalidValue { line };

        match key {
            "address" => config.address = parse_address(value).ok_or(invalid)?,
            "peer_address" => config.peer_address = parse_address(value).ok_or(invalid)?,
            "target_rpm" => config.target_rpm = parse_int(value).ok_or(invalid)?,
            "pulses_per_rev_x10" => {
                config.pulses_per_rev_x10 = parse_positive(value).ok_or(invalid)?
            }
            "sample_period_ms" => config.sample_period_ms = parse_positive(value).ok_or(invalid)?,
            "kp_x100" => config.kp_x100 = parse_int(value).ok_or(invalid)?,
            "max_duty" => {
                config.max_duty = parse_int::<u16>(value).filter(|&d| d > 0).ok_or(invalid)?
            }
            "stall_periods" => {
                config.stall_periods = parse_int::<u8>(value).filter(|&p| p > 0).ok_or(invalid)?
            }
            "face_refresh_ms" => config.face_refresh_ms = parse_positive(value).ok_or(invalid)?,
            "start_time" => {
                config.start_time = parse_string(value)
                    .filter(|text: &String<5>| ClockTime::parse(text).is_some())
                    .ok_or(invalid)?
            }
            "keepalive_ms" => config.keepalive_ms = parse_positive(value).ok_or(invalid)?,
            "chime" => config.chime = parse_bool(value).ok_or(invalid)?,
            "baudrate" => config.baudrate = parse_positive(value).ok_or(invalid)?,
            _ => return Err(ConfigError::UnknownKey { line }),
        }
    }

    Ok(config)
}
