//! Rotor speed controller
//!
//! Every control period the controller compares the pulses counted against
//! the pulses expected at the target speed and nudges the duty by
//! `Kp * error`. The duty accumulates between periods, so the controller
//! behaves as an integrator with proportional gain and settles with no
//! steady-state error.
//!
//! With no pulses at all (sensor unplugged, rotor blocked) the duty climbs
//! to full scale within a bounded number of periods and stays there.
//!
//! ```ignore
//! let mut controller = SpeedController::new(SpeedControlConfig::default());
//!
//! // Every sample_period_ms:
//! let duty = controller.update(encoder.take());
//! pwm.set_duty(duty);
//! ```

use portable_atomic::{AtomicU16, Ordering};

/// Speed controller configuration
///
/// Fractional constants are stored scaled so all arithmetic stays integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedControlConfig {
    /// Setpoint
    pub target_rpm: u32,
    /// Encoder pulses per revolution ×10 (52.8 is stored as 528)
    pub pulses_per_rev_x10: u32,
    /// Control period in ms
    pub period_ms: u32,
    /// Proportional gain ×100
    pub kp_x100: i32,
    /// Full scale duty
    pub max_duty: u16,
}

impl Default for SpeedControlConfig {
    fn default() -> Self {
        Self {
            target_rpm: 1500,
            pulses_per_rev_x10: 528,
            period_ms: 250,
            kp_x100: 100,
            max_duty: 1024,
        }
    }
}

impl SpeedControlConfig {
    /// Pulses one period should contain at the target speed
    pub fn expected_pulses(&self) -> u32 {
        let pulses_x10 =
            self.target_rpm as u64 * self.pulses_per_rev_x10 as u64 * self.period_ms as u64;
        (pulses_x10 / (60_000 * 10)) as u32
    }

    /// Speed implied by `pulses` counted in one period
    pub fn measured_rpm(&self, pulses: u32) -> u32 {
        let denominator = self.pulses_per_rev_x10 as u64 * self.period_ms as u64;
        if denominator == 0 {
            return 0;
        }
        (pulses as u64 * 60_000 * 10 / denominator) as u32
    }
}

/// Integrating speed controller
#[derive(Debug, Clone)]
pub struct SpeedController {
    config: SpeedControlConfig,
    expected: i32,
    duty: i32,
}

impl SpeedController {
    /// Create a controller starting from zero duty
    pub fn new(config: SpeedControlConfig) -> Self {
        Self {
            expected: config.expected_pulses().min(i32::MAX as u32) as i32,
            config,
            duty: 0,
        }
    }

    pub fn config(&self) -> &SpeedControlConfig {
        &self.config
    }

    /// Current duty
    pub fn duty(&self) -> u16 {
        self.duty as u16
    }

    /// Drop the accumulated duty
    pub fn reset(&mut self) {
        self.duty = 0;
    }

    /// Feed the pulses counted over the last period
    ///
    /// Returns the new duty, always within `0..=max_duty`.
    pub fn update(&mut self, measured: u32) -> u16 {
        let measured = measured.min(i32::MAX as u32) as i32;
        let error = self.expected.saturating_sub(measured);
        let step = (error as i64 * self.config.kp_x100 as i64 / 100)
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        self.duty = self
            .duty
            .saturating_add(step)
            .clamp(0, self.config.max_duty as i32);
        self.duty as u16
    }
}

/// Last applied duty, readable from any task
pub struct DutyCell {
    duty: AtomicU16,
}

impl Default for DutyCell {
    fn default() -> Self {
        Self::new()
    }
}

impl DutyCell {
    pub const fn new() -> Self {
        Self {
            duty: AtomicU16::new(0),
        }
    }

    pub fn store(&self, duty: u16) {
        self.duty.store(duty, Ordering::Relaxed);
    }

    pub fn load(&self) -> u16 {
        self.duty.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_pulses_reference() {
        // 1500 rpm * 52.8 pulses/rev * 0.25 s / 60 s = 330
        let config = SpeedControlConfig::default();
        assert_eq!(config.expected_pulses(), 330);
        assert_eq!(config.measured_rpm(330), 1500);
        assert_eq!(config.measured_rpm(0), 0);
    }

    #[test]
    fn test_duty_accumulates() {
        let mut controller = SpeedController::new(SpeedControlConfig::default());
        assert_eq!(controller.update(300), 30);
        assert_eq!(controller.update(300), 60);
        // On target: duty holds
        assert_eq!(controller.update(330), 60);
        // Too fast: duty drops
        assert_eq!(controller.update(350), 40);
    }

    #[test]
    fn test_duty_clamped() {
        let mut controller = SpeedController::new(SpeedControlConfig::default());
        for _ in 0..10 {
            controller.update(0);
        }
        assert_eq!(controller.duty(), 1024);

        controller.update(u32::MAX);
        assert_eq!(controller.duty(), 0);
    }

    #[test]
    fn test_fractional_gain() {
        let config = SpeedControlConfig {
            kp_x100: 50,
            ..SpeedControlConfig::default()
        };
        let mut controller = SpeedController::new(config);
        assert_eq!(controller.update(230), 50);
    }

    #[test]
    fn test_reset() {
        let mut controller = SpeedController::new(SpeedControlConfig::default());
        controller.update(0);
        controller.reset();
        assert_eq!(controller.duty(), 0);
    }

    #[test]
    fn test_duty_cell() {
        let cell = DutyCell::new();
        cell.store(512);
        assert_eq!(cell.load(), 512);
    }
}
