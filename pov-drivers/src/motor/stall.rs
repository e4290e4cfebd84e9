//! Rotor stall detection
//!
//! Counts consecutive control periods without a single encoder pulse. The
//! speed controller already saturates the duty in that case; this only makes
//! the condition visible.

/// Zero-pulse periods before a stall is reported (2 s at 250 ms)
pub const DEFAULT_STALL_PERIODS: u8 = 8;

/// Change of stall condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StallChange {
    Stalled,
    Cleared,
}

#[derive(Debug, Clone)]
pub struct StallDetector {
    threshold: u8,
    zero_periods: u8,
    stalled: bool,
}

impl Default for StallDetector {
    fn default() -> Self {
        Self::new(DEFAULT_STALL_PERIODS)
    }
}

impl StallDetector {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold: threshold.max(1),
            zero_periods: 0,
            stalled: false,
        }
    }

    /// Feed the pulses counted over the last period
    pub fn update(&mut self, pulses: u32) -> Option<StallChange> {
        if pulses > 0 {
            self.zero_periods = 0;
            if self.stalled {
                self.stalled = false;
                return Some(StallChange::Cleared);
            }
            return None;
        }

        self.zero_periods = self.zero_periods.saturating_add(1);
        if !self.stalled && self.zero_periods >= self.threshold {
            self.stalled = true;
            return Some(StallChange::Stalled);
        }
        None
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled
    }
}
