//! Time of day keeping and chime scheduling

use crate::traits::Chime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Hour and minute of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
}

impl ClockTime {
    /// Create a time, rejecting out of range fields
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Parse `HH:MM` (the hour may be a single digit)
    pub fn parse(text: &str) -> Option<Self> {
        let (hour, minute) = text.trim().split_once(':')?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return None;
        }
        Self::new(hour.parse().ok()?, minute.parse().ok()?)
    }

    /// Minutes since midnight
    pub fn minutes_of_day(&self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    fn from_minutes_of_day(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }
}

/// Free-running clock started at a configured time of day
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start_minutes: u32,
}

impl WallClock {
    /// Start the clock at `start` when the uptime is zero
    pub fn new(start: ClockTime) -> Self {
        Self {
            start_minutes: start.minutes_of_day(),
        }
    }

    /// Time of day after `uptime_secs` seconds
    pub fn time_at(&self, uptime_secs: u64) -> ClockTime {
        let elapsed = ((uptime_secs / 60) % MINUTES_PER_DAY as u64) as u32;
        ClockTime::from_minutes_of_day(self.start_minutes + elapsed)
    }
}

/// Number of strikes for an hour, twelve at noon and midnight
pub fn strikes_for_hour(hour: u8) -> u8 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

/// Fires the chime once at the top of each hour
#[derive(Debug, Clone, Default)]
pub struct ChimeSchedule {
    last_chimed: Option<ClockTime>,
}

impl ChimeSchedule {
    pub fn new() -> Self {
        Self { last_chimed: None }
    }

    /// Schedule that treats `now` as already chimed
    ///
    /// Booting on the hour does not strike; the next hour does.
    pub fn starting_at(now: ClockTime) -> Self {
        Self {
            last_chimed: Some(now),
        }
    }

    /// Check the time and start the chime when the hour has just turned
    ///
    /// Returns the number of strikes when the chime was started.
    pub fn poll<C: Chime>(&mut self, now: ClockTime, chime: &mut C) -> Option<u8> {
        if now.minute != 0 || self.last_chimed == Some(now) {
            return None;
        }

        self.last_chimed = Some(now);
        let strikes = strikes_for_hour(now.hour);
        chime.strike(strikes);
        Some(strikes)
    }
}
